#![cfg(feature = "test-utils")]

use chrono::NaiveDate;
use school_db::prelude::*;
use school_db::queries;
use school_db::test_utils::{setup_postgres_embedded, stop_postgres_embedded};
use school_db::walkthrough::{self, StepOutput};

#[test]
fn test7_postgres_walkthrough_and_constraints() -> Result<(), Box<dyn std::error::Error>> {
    let postgres = setup_postgres_embedded()?;
    let server = SchoolDb::new(postgres.config.clone());

    let rt = tokio::runtime::Runtime::new()?;
    let result = rt.block_on(async {
        let report = walkthrough::run(&server).await;
        let failed: Vec<_> = report.failures().map(|s| s.step.as_str()).collect();
        assert!(failed.is_empty(), "failed steps: {failed:?}");

        let db = server.for_database("school");
        assert_eq!(db.config().database(), Some("school"));

        // Native DATE and BOOLEAN columns come back typed.
        let courses = db.read_all::<Course>().await?;
        assert_eq!(courses.len(), 9);
        assert_eq!(courses[0].start_date, NaiveDate::from_ymd_opt(2020, 2, 1));
        assert_eq!(courses[0].in_school, Some(true));
        let rs = db.read_query("SELECT dob FROM teacher WHERE teacher_id = 1").await?;
        assert_eq!(
            rs.results[0].get("dob"),
            Some(&RowValues::Date(NaiveDate::from_ymd_opt(1985, 4, 20).unwrap_or_default()))
        );

        // Aggregates over integer columns come back as numeric.
        let rs = db
            .read_query(
                "SELECT AVG(course_length_weeks) AS avg_weeks, \
                 SUM(course_length_weeks::bigint) AS total_weeks FROM course",
            )
            .await?;
        let avg = rs.results[0].get("avg_weeks").and_then(RowValues::as_float);
        assert!(avg.is_some_and(|v| (v - 185.0 / 9.0).abs() < 1e-9), "{avg:?}");
        assert_eq!(rs.results[0].get("total_weeks"), Some(&RowValues::Float(185.0)));
        let rs = db.read_query("SELECT 1.25 AS ratio, NULL::numeric AS missing").await?;
        assert_eq!(rs.rows_as_lists()[0], vec![RowValues::Float(1.25), RowValues::Null]);

        match report.step("read client 101").map(|s| &s.result) {
            Some(Ok(StepOutput::Rows(table))) => {
                let address = table.column("address").unwrap_or_default();
                assert_eq!(address[0].as_text(), Some(queries::NEW_CLIENT_101_ADDRESS));
            }
            other => panic!("unexpected read outcome: {other:?}"),
        }

        // The database already exists.
        let err = server.create_database("school").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Statement);

        // Deleting a teacher nulls the courses they taught.
        db.execute_query("DELETE FROM teacher WHERE teacher_id = 6").await?;
        let rs = db
            .read_query("SELECT COUNT(*) AS n FROM course WHERE teacher IS NULL")
            .await?;
        assert_eq!(rs.results[0].get("n"), Some(&RowValues::Int(3)));

        // Unique tax ids: the batch is rejected as a whole.
        let rows = vec![
            vec![
                RowValues::Int(20),
                "Ana".into(),
                "Lopez".into(),
                "SPA".into(),
                RowValues::Null,
                RowValues::Null,
                RowValues::Int(99999),
                RowValues::Null,
            ],
            vec![
                RowValues::Int(21),
                "Ben".into(),
                "Okafor".into(),
                "ENG".into(),
                RowValues::Null,
                RowValues::Null,
                RowValues::Int(99999),
                RowValues::Null,
            ],
        ];
        let err = db
            .execute_list_query(school_db::fixtures::TEACHER_INSERT, &rows)
            .await
            .unwrap_err();
        assert!(err.is_constraint_violation(), "unexpected error: {err}");
        let rs = db.read_query("SELECT COUNT(*) AS n FROM teacher").await?;
        assert_eq!(rs.results[0].get("n"), Some(&RowValues::Int(7)));

        // Wrong credentials surface as a connection failure.
        let bad = ConnectionConfig::builder(DatabaseType::Postgres, postgres.config.host())
            .port(postgres.port)
            .user("nobody")
            .password("wrong")
            .finish();
        assert!(connect_or_log(&bad).await.is_none());
        Ok::<(), SchoolDbError>(())
    });

    stop_postgres_embedded(postgres);
    result?;
    Ok(())
}
