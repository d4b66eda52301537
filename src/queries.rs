//! SQL used by the walkthrough and the sample reports.

pub const ALL_TEACHERS: &str = "SELECT * FROM teacher";

pub const TEACHER_NAMES_AND_BIRTHDAYS: &str = "SELECT last_name, dob FROM teacher";

pub const ENGLISH_COURSES_NEWEST_FIRST: &str = r"
SELECT *
FROM course
WHERE language = 'ENG'
ORDER BY start_date DESC";

pub const TEACHERS_BORN_BEFORE_1990: &str = r"
SELECT first_name, last_name, phone_no
FROM teacher
WHERE dob < '1990-01-01'";

pub const OUT_OF_SCHOOL_COURSES: &str = r"
SELECT course.course_id, course.course_name, course.language, client.client_name, client.address
FROM course
JOIN client
ON course.client = client.client_id
WHERE course.in_school = FALSE";

/// Labels for the columns of [`OUT_OF_SCHOOL_COURSES`].
pub const OUT_OF_SCHOOL_COURSES_COLUMNS: [&str; 5] =
    ["course_id", "course_name", "language", "client_name", "address"];

pub const CLIENT_101: &str = "SELECT * FROM client WHERE client_id = 101";

pub const ALL_COURSES: &str = "SELECT * FROM course";

pub const UPDATE_CLIENT_101_ADDRESS: &str = r"
UPDATE client
SET address = '23 Fingiertweg, 14534 Berlin'
WHERE client_id = 101";

pub const NEW_CLIENT_101_ADDRESS: &str = "23 Fingiertweg, 14534 Berlin";

pub const DELETE_COURSE_20: &str = "DELETE FROM course WHERE course_id = 20";

pub const RESTORE_COURSE_20: &str = r"
INSERT INTO course VALUES
(20, 'Fortgeschrittenes Russisch', 'RUS', 'C1', 4, '2020-04-08', FALSE, 5, 103)";

/// A named read used by reports.
#[derive(Debug, Clone, Copy)]
pub struct SampleQuery {
    pub name: &'static str,
    pub sql: &'static str,
    /// Caller-chosen labels; `None` keeps the server's column names.
    pub columns: Option<&'static [&'static str]>,
}

/// The reads the walkthrough runs after populating the database.
pub const SAMPLE_QUERIES: [SampleQuery; 5] = [
    SampleQuery {
        name: "all teachers",
        sql: ALL_TEACHERS,
        columns: None,
    },
    SampleQuery {
        name: "teacher last names and birth dates",
        sql: TEACHER_NAMES_AND_BIRTHDAYS,
        columns: None,
    },
    SampleQuery {
        name: "english courses, newest first",
        sql: ENGLISH_COURSES_NEWEST_FIRST,
        columns: None,
    },
    SampleQuery {
        name: "teachers born before 1990",
        sql: TEACHERS_BORN_BEFORE_1990,
        columns: None,
    },
    SampleQuery {
        name: "out-of-school courses and their clients",
        sql: OUT_OF_SCHOOL_COURSES,
        columns: Some(&OUT_OF_SCHOOL_COURSES_COLUMNS),
    },
];
