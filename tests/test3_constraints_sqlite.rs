#![cfg(feature = "sqlite")]

use school_db::prelude::*;
use school_db::{fixtures, schema};

async fn loaded_session() -> Result<Session, SchoolDbError> {
    let mut session = Session::open(&ConnectionConfig::sqlite(":memory:")).await?;
    schema::create_schema(&mut session).await?;
    fixtures::populate(&mut session).await?;
    Ok(session)
}

async fn count(session: &Session, sql: &str) -> Result<i64, SchoolDbError> {
    let rs = read_query(session, sql).await?;
    Ok(rs
        .results
        .first()
        .and_then(|row| row.get_by_index(0))
        .and_then(RowValues::as_int)
        .copied()
        .unwrap_or(-1))
}

#[test]
fn test3_deletes_cascade_to_enrollments() -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let mut session = loaded_session().await?;
        assert_eq!(count(&session, "SELECT COUNT(*) FROM takes_course").await?, 17);

        let affected = execute_query(&mut session, "DELETE FROM course WHERE course_id = 20").await?;
        assert_eq!(affected, 1);
        assert_eq!(
            count(&session, "SELECT COUNT(*) FROM takes_course WHERE course_id = 20").await?,
            0
        );
        assert_eq!(count(&session, "SELECT COUNT(*) FROM takes_course").await?, 16);

        execute_query(&mut session, "DELETE FROM participant WHERE participant_id = 109").await?;
        assert_eq!(
            count(&session, "SELECT COUNT(*) FROM takes_course WHERE participant_id = 109").await?,
            0
        );
        assert_eq!(count(&session, "SELECT COUNT(*) FROM takes_course").await?, 14);
        Ok::<(), SchoolDbError>(())
    })?;
    Ok(())
}

#[test]
fn test3_deletes_nullify_references() -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let mut session = loaded_session().await?;

        execute_query(&mut session, "DELETE FROM teacher WHERE teacher_id = 6").await?;
        let rs = read_query(
            &session,
            "SELECT course_id, teacher FROM course WHERE course_id IN (13, 14, 15) ORDER BY course_id",
        )
        .await?;
        assert_eq!(rs.len(), 3);
        assert!(rs.results.iter().all(|row| row.get("teacher") == Some(&RowValues::Null)));

        execute_query(&mut session, "DELETE FROM client WHERE client_id = 101").await?;
        assert_eq!(
            count(&session, "SELECT COUNT(*) FROM participant WHERE client IS NULL").await?,
            6
        );
        assert_eq!(
            count(&session, "SELECT COUNT(*) FROM course WHERE client IS NULL").await?,
            4
        );
        // Courses survive with their enrollments intact.
        assert_eq!(count(&session, "SELECT COUNT(*) FROM course").await?, 9);
        assert_eq!(count(&session, "SELECT COUNT(*) FROM takes_course").await?, 17);
        Ok::<(), SchoolDbError>(())
    })?;
    Ok(())
}

#[test]
fn test3_duplicate_tax_id_rolls_back_whole_batch() -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let mut session = loaded_session().await?;

        let rows = vec![
            vec![
                RowValues::Int(9),
                "Ana".into(),
                "Lopez".into(),
                "SPA".into(),
                RowValues::Null,
                RowValues::Null,
                RowValues::Int(99999),
                RowValues::Null,
            ],
            vec![
                RowValues::Int(10),
                "Ben".into(),
                "Okafor".into(),
                "ENG".into(),
                RowValues::Null,
                RowValues::Null,
                RowValues::Int(99999),
                RowValues::Null,
            ],
        ];
        let err = execute_list_query(&mut session, fixtures::TEACHER_INSERT, &rows)
            .await
            .unwrap_err();
        assert!(err.is_constraint_violation(), "unexpected error: {err}");
        assert_eq!(err.kind(), ErrorKind::Statement);
        assert_eq!(count(&session, "SELECT COUNT(*) FROM teacher").await?, 6);

        // An existing tax id is rejected the same way.
        let err = execute_dml(
            &mut session,
            fixtures::TEACHER_INSERT,
            &[
                RowValues::Int(11),
                "Cara".into(),
                "Byrne".into(),
                "IRI".into(),
                RowValues::Null,
                RowValues::Null,
                RowValues::Int(12345),
                RowValues::Null,
            ],
        )
        .await
        .unwrap_err();
        assert!(err.is_constraint_violation());
        assert_eq!(count(&session, "SELECT COUNT(*) FROM teacher").await?, 6);
        Ok::<(), SchoolDbError>(())
    })?;
    Ok(())
}

#[test]
fn test3_enrollment_needs_existing_rows() -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let mut session = loaded_session().await?;

        let err = execute_query(
            &mut session,
            "INSERT INTO takes_course VALUES (999, 12)",
        )
        .await
        .unwrap_err();
        assert!(err.is_constraint_violation());

        // Duplicate link violates the composite primary key.
        let err = execute_query(&mut session, "INSERT INTO takes_course VALUES (101, 15)")
            .await
            .unwrap_err();
        assert!(err.is_constraint_violation());
        assert_eq!(count(&session, "SELECT COUNT(*) FROM takes_course").await?, 17);
        Ok::<(), SchoolDbError>(())
    })?;
    Ok(())
}

#[test]
fn test3_batch_arity_is_checked_before_running() -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let mut session = loaded_session().await?;

        let rows = vec![
            vec![RowValues::Int(115), "Eva".into(), "Klein".into(), RowValues::Null, RowValues::Int(101)],
            vec![RowValues::Int(116), "Ole".into(), "Berg".into()],
        ];
        let err = execute_list_query(
            &mut session,
            "INSERT INTO participant VALUES (%s, %s, %s, %s, %s)",
            &rows,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, SchoolDbError::ParameterError(_)));
        assert_eq!(count(&session, "SELECT COUNT(*) FROM participant").await?, 14);

        let empty: Vec<Vec<RowValues>> = Vec::new();
        assert_eq!(
            execute_list_query(&mut session, "INSERT INTO participant VALUES (%s)", &empty).await?,
            0
        );
        Ok::<(), SchoolDbError>(())
    })?;
    Ok(())
}
