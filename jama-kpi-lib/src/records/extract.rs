//! Projection of filtered records into the flat rows used for aggregation and export.

use super::Record;
use crate::users::{UserDirectory, UserName};
use serde::Serialize;

pub const DOCUMENT_KEY: &str = "documentKey";
pub const ASSIGNED_TO: &str = "assignedTo";
pub const CREATED_BY: &str = "createdBy";
pub const EXECUTION_DATE: &str = "executionDate";
pub const NAME: &str = "name";
pub const TEST_RUN_STATUS: &str = "testRunStatus";

/// One executed test run, attributed to its assignee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestRunRow {
    pub document_key: Option<String>,
    pub user: UserName,
    pub execution_date: Option<String>,
}

/// One logged defect, attributed to its creator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DefectRow {
    pub document_key: Option<String>,
    pub user: UserName,
}

/// Flat view of a test run's fields for the "Test run" table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestRunProjection {
    #[serde(rename = "TestRunStatus")]
    pub test_run_status: Option<String>,
    #[serde(rename = "ExecutionDate")]
    pub execution_date: Option<String>,
    #[serde(rename = "Document Key")]
    pub document_key: Option<String>,
    #[serde(rename = "Name")]
    pub name: Option<String>,
    #[serde(rename = "Assigned To")]
    pub assigned_to: UserName,
}

/// Flat view of a defect's fields for the "Defect" table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DefectProjection {
    #[serde(rename = "Document Key")]
    pub document_key: Option<String>,
    #[serde(rename = "Name")]
    pub name: Option<String>,
    #[serde(rename = "Created By")]
    pub created_by: UserName,
    #[serde(rename = "Found in Build")]
    pub found_in_build: Option<String>,
    #[serde(rename = "Found On Date")]
    pub found_on_date: Option<String>,
}

/// Instance-specific custom field names for defects.
#[derive(Debug, Clone, Copy)]
pub struct DefectFields<'a> {
    pub found_in_build: &'a str,
    pub found_on_date: &'a str,
}

#[must_use]
pub fn testrun_row(record: &Record, directory: &UserDirectory) -> TestRunRow {
    TestRunRow {
        document_key: record.find_text(DOCUMENT_KEY),
        user: directory.name_of(record.find_user_id(ASSIGNED_TO).as_ref()),
        execution_date: record.find_text(EXECUTION_DATE),
    }
}

#[must_use]
pub fn defect_row(record: &Record, directory: &UserDirectory) -> DefectRow {
    DefectRow {
        document_key: record.find_text(DOCUMENT_KEY),
        user: directory.name_of(record.find_user_id(CREATED_BY).as_ref()),
    }
}

#[must_use]
pub fn testrun_projection(record: &Record, directory: &UserDirectory) -> TestRunProjection {
    TestRunProjection {
        test_run_status: record.field_text(TEST_RUN_STATUS),
        execution_date: record.field_text(EXECUTION_DATE),
        document_key: record.field_text(DOCUMENT_KEY),
        name: record.field_text(NAME),
        assigned_to: directory.name_of(record.field_user_id(ASSIGNED_TO).as_ref()),
    }
}

#[must_use]
pub fn defect_projection(record: &Record, directory: &UserDirectory, fields: DefectFields<'_>) -> DefectProjection {
    DefectProjection {
        document_key: record.field_text(DOCUMENT_KEY),
        name: record.field_text(NAME),
        created_by: directory.name_of(record.field_user_id(CREATED_BY).as_ref()),
        found_in_build: record.field_text(fields.found_in_build),
        found_on_date: record.field_text(fields.found_on_date),
    }
}
