#![cfg(feature = "sqlite")]

use school_db::prelude::*;
use school_db::schema;

fn texts(rs: &ResultSet, column: &str) -> Vec<String> {
    rs.results
        .iter()
        .map(|row| row.get(column).and_then(RowValues::as_text).unwrap_or("").to_string())
        .collect()
}

#[test]
fn test1_sqlite_schema_columns_and_keys() -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let mut session = Session::open(&ConnectionConfig::sqlite(":memory:")).await?;
        schema::create_schema(&mut session).await?;

        let rs = read_query(
            &session,
            "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
        )
        .await?;
        assert_eq!(
            texts(&rs, "name"),
            vec!["client", "course", "participant", "takes_course", "teacher"]
        );

        let rs = read_query(
            &session,
            r#"SELECT name, type, "notnull", pk FROM pragma_table_info('teacher') ORDER BY cid"#,
        )
        .await?;
        assert_eq!(
            texts(&rs, "name"),
            vec![
                "teacher_id", "first_name", "last_name", "language_1", "language_2", "dob",
                "tax_id", "phone_no"
            ]
        );
        assert_eq!(
            texts(&rs, "type"),
            vec!["INT", "VARCHAR(40)", "VARCHAR(40)", "VARCHAR(3)", "VARCHAR(3)", "DATE", "INT", "VARCHAR(20)"]
        );
        let not_null: Vec<i64> = rs
            .results
            .iter()
            .map(|row| *row.get("notnull").and_then(RowValues::as_int).unwrap_or(&-1))
            .collect();
        assert_eq!(&not_null[1..], &[1, 1, 1, 0, 0, 0, 0]);
        assert_eq!(rs.results[0].get("pk"), Some(&RowValues::Int(1)));

        // tax_id carries the only UNIQUE constraint
        let rs = read_query(
            &session,
            r#"SELECT ii.name AS column_name
               FROM pragma_index_list('teacher') AS il
               JOIN pragma_index_info(il.name) AS ii
               WHERE il."unique" = 1 AND il.origin = 'u'"#,
        )
        .await?;
        assert_eq!(texts(&rs, "column_name"), vec!["tax_id"]);

        let rs = read_query(
            &session,
            r#"SELECT name, pk FROM pragma_table_info('takes_course') WHERE pk > 0 ORDER BY pk"#,
        )
        .await?;
        assert_eq!(texts(&rs, "name"), vec!["participant_id", "course_id"]);

        session.close().await?;
        Ok::<(), SchoolDbError>(())
    })?;
    Ok(())
}

#[test]
fn test1_sqlite_foreign_key_actions() -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let mut session = Session::open(&ConnectionConfig::sqlite(":memory:")).await?;
        schema::create_schema(&mut session).await?;

        let fk_sql = r#"SELECT "table", "from", "to", on_delete FROM pragma_foreign_key_list(?1) ORDER BY "from""#;
        let describe = |rs: &ResultSet| -> Vec<String> {
            rs.results
                .iter()
                .map(|row| {
                    row.values()
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .collect()
        };

        let rs = read_query_with_params(&session, fk_sql, &["participant".into()]).await?;
        assert_eq!(describe(&rs), vec!["client client client_id SET NULL"]);

        let rs = read_query_with_params(&session, fk_sql, &["course".into()]).await?;
        assert_eq!(
            describe(&rs),
            vec![
                "client client client_id SET NULL",
                "teacher teacher teacher_id SET NULL"
            ]
        );

        let rs = read_query_with_params(&session, fk_sql, &["takes_course".into()]).await?;
        assert_eq!(
            describe(&rs),
            vec![
                "course course_id course_id CASCADE",
                "participant participant_id participant_id CASCADE"
            ]
        );

        let rs = read_query(&session, "PRAGMA foreign_keys").await?;
        assert_eq!(rs.results[0].values(), &[RowValues::Int(1)]);

        // Tables already exist, so a second pass stops at the first statement.
        let err = schema::create_schema(&mut session).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Statement);

        schema::drop_schema(&mut session).await?;
        let rs = read_query(&session, "SELECT name FROM sqlite_master WHERE type = 'table'").await?;
        assert!(rs.is_empty());
        Ok::<(), SchoolDbError>(())
    })?;
    Ok(())
}
