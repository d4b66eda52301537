//! The fixed dataset loaded into a fresh school database.

use chrono::NaiveDate;

use crate::error::SchoolDbError;
use crate::executor::execute_list_query;
use crate::model::{Client, Course, Enrollment, Entity, Participant, Teacher};
use crate::session::Session;

/// `(teacher_id, first_name, last_name, language_1, language_2, dob, tax_id, phone_no)`
pub type TeacherRow = (
    i64,
    &'static str,
    &'static str,
    &'static str,
    Option<&'static str>,
    &'static str,
    i64,
    &'static str,
);

/// `(client_id, client_name, address, industry)`
pub type ClientRow = (i64, &'static str, &'static str, &'static str);

/// `(participant_id, first_name, last_name, phone_no, client)`
pub type ParticipantRow = (i64, &'static str, &'static str, &'static str, i64);

/// `(course_id, course_name, language, level, course_length_weeks, start_date, in_school, teacher, client)`
pub type CourseRow = (
    i64,
    &'static str,
    &'static str,
    &'static str,
    i64,
    &'static str,
    bool,
    i64,
    i64,
);

/// `(participant_id, course_id)`
pub type EnrollmentRow = (i64, i64);

pub const TEACHERS: [TeacherRow; 6] = [
    (1, "James", "Smith", "ENG", None, "1985-04-20", 12345, "+491774553676"),
    (2, "Stefanie", "Martin", "FRA", None, "1970-02-17", 23456, "+491234567890"),
    (3, "Steve", "Wang", "MAN", Some("ENG"), "1990-11-12", 34567, "+447840921333"),
    (4, "Friederike", "Müller-Rossi", "DEU", Some("ITA"), "1987-07-07", 45678, "+492345678901"),
    (5, "Isobel", "Ivanova", "RUS", Some("ENG"), "1963-05-30", 56789, "+491772635467"),
    (6, "Niamh", "Murphy", "ENG", Some("IRI"), "1995-09-08", 67890, "+491231231232"),
];

pub const CLIENTS: [ClientRow; 5] = [
    (101, "Big Business Federation", "123 Falschungstraße, 10999 Berlin", "NGO"),
    (102, "eCommerce GmbH", "27 Ersatz Allee, 10317 Berlin", "Retail"),
    (103, "AutoMaker AG", "20 Künstlichstraße, 10023 Berlin", "Auto"),
    (104, "Banko Bank", "12 Betrugstraße, 12345 Berlin", "Banking"),
    (105, "WeMoveIt GmbH", "138 Arglistweg, 10065 Berlin", "Logistics"),
];

pub const PARTICIPANTS: [ParticipantRow; 14] = [
    (101, "Marina", "Berg", "491635558182", 101),
    (102, "Andrea", "Duerr", "49159555740", 101),
    (103, "Philipp", "Probst", "49155555692", 102),
    (104, "René", "Brandt", "4916355546", 102),
    (105, "Susanne", "Shuster", "49155555779", 102),
    (106, "Christian", "Schreiner", "49162555375", 101),
    (107, "Harry", "Kim", "49177555633", 101),
    (108, "Jan", "Nowak", "49151555824", 101),
    (109, "Pablo", "Garcia", "49162555176", 101),
    (110, "Melanie", "Dreschler", "49151555527", 103),
    (111, "Dieter", "Durr", "49178555311", 103),
    (112, "Max", "Mustermann", "49152555195", 104),
    (113, "Maxine", "Mustermann", "49177555355", 104),
    (114, "Heiko", "Fleischer", "49155555581", 105),
];

pub const COURSES: [CourseRow; 9] = [
    (12, "English for Logistics", "ENG", "A1", 10, "2020-02-01", true, 1, 105),
    (13, "Beginner English", "ENG", "A2", 40, "2019-11-12", false, 6, 101),
    (14, "Intermediate English", "ENG", "B2", 40, "2019-11-12", false, 6, 101),
    (15, "Advanced English", "ENG", "C1", 40, "2019-11-12", false, 6, 101),
    (16, "Mandarin für Autoindustrie", "MAN", "B1", 15, "2020-01-15", true, 3, 103),
    (17, "Français intermédiaire", "FRA", "B1", 18, "2020-04-03", false, 2, 101),
    (18, "Deutsch für Anfänger", "DEU", "A2", 8, "2020-02-14", true, 4, 102),
    (19, "Intermediate English", "ENG", "B2", 10, "2020-03-29", false, 1, 104),
    (20, "Fortgeschrittenes Russisch", "RUS", "C1", 4, "2020-04-08", false, 5, 103),
];

pub const ENROLLMENTS: [EnrollmentRow; 17] = [
    (101, 15),
    (101, 17),
    (102, 17),
    (103, 18),
    (104, 18),
    (105, 18),
    (106, 13),
    (107, 13),
    (108, 13),
    (109, 14),
    (109, 15),
    (110, 16),
    (110, 20),
    (111, 16),
    (114, 12),
    (112, 19),
    (113, 19),
];

/// Teachers added after the initial load by a separate batch insert.
pub const EXTRA_TEACHERS: [TeacherRow; 2] = [
    (7, "Hank", "Dodson", "ENG", None, "1991-12-23", 11111, "+491772345678"),
    (8, "Sue", "Perkins", "MAN", Some("ENG"), "1976-02-02", 22222, "+491443456432"),
];

/// Format-style template used for [`EXTRA_TEACHERS`].
pub const TEACHER_INSERT: &str = "INSERT INTO teacher (teacher_id, first_name, last_name, language_1, language_2, dob, tax_id, phone_no) VALUES (%s, %s, %s, %s, %s, %s, %s, %s)";

fn date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

#[must_use]
pub fn teacher(row: &TeacherRow) -> Teacher {
    let (teacher_id, first, last, lang_1, lang_2, dob, tax_id, phone) = *row;
    Teacher {
        teacher_id,
        first_name: first.to_string(),
        last_name: last.to_string(),
        language_1: lang_1.to_string(),
        language_2: lang_2.map(str::to_string),
        dob: date(dob),
        tax_id: Some(tax_id),
        phone_no: Some(phone.to_string()),
    }
}

#[must_use]
pub fn teachers() -> Vec<Teacher> {
    TEACHERS.iter().map(teacher).collect()
}

#[must_use]
pub fn extra_teachers() -> Vec<Teacher> {
    EXTRA_TEACHERS.iter().map(teacher).collect()
}

#[must_use]
pub fn clients() -> Vec<Client> {
    CLIENTS
        .iter()
        .map(|&(client_id, name, address, industry)| Client {
            client_id,
            client_name: name.to_string(),
            address: address.to_string(),
            industry: Some(industry.to_string()),
        })
        .collect()
}

#[must_use]
pub fn participants() -> Vec<Participant> {
    PARTICIPANTS
        .iter()
        .map(|&(participant_id, first, last, phone, client)| Participant {
            participant_id,
            first_name: first.to_string(),
            last_name: last.to_string(),
            phone_no: Some(phone.to_string()),
            client: Some(client),
        })
        .collect()
}

#[must_use]
pub fn courses() -> Vec<Course> {
    COURSES
        .iter()
        .map(
            |&(course_id, name, language, level, weeks, start, in_school, teacher, client)| Course {
                course_id,
                course_name: name.to_string(),
                language: language.to_string(),
                level: Some(level.to_string()),
                course_length_weeks: Some(weeks),
                start_date: date(start),
                in_school: Some(in_school),
                teacher: Some(teacher),
                client: Some(client),
            },
        )
        .collect()
}

#[must_use]
pub fn enrollments() -> Vec<Enrollment> {
    ENROLLMENTS
        .iter()
        .map(|&(participant_id, course_id)| Enrollment {
            participant_id,
            course_id,
        })
        .collect()
}

/// Batch-insert `records` into their table in one transaction.
///
/// # Errors
/// Returns the batch executor's error; no row of the batch is committed then.
pub async fn insert_all<T: Entity>(
    session: &mut Session,
    records: &[T],
) -> Result<usize, SchoolDbError> {
    let rows: Vec<_> = records.iter().map(Entity::to_params).collect();
    execute_list_query(session, &T::insert_template(), &rows).await
}

/// Load the whole dataset, parents before children.
///
/// Returns the number of rows inserted. Each table is its own batch, so a
/// failure leaves earlier tables populated.
///
/// # Errors
/// Returns the first failing batch's error.
pub async fn populate(session: &mut Session) -> Result<usize, SchoolDbError> {
    let mut inserted = insert_all(session, &teachers()).await?;
    inserted += insert_all(session, &clients()).await?;
    inserted += insert_all(session, &participants()).await?;
    inserted += insert_all(session, &courses()).await?;
    inserted += insert_all(session, &enrollments()).await?;
    tracing::info!(inserted, "fixtures loaded");
    Ok(inserted)
}
