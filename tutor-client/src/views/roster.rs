//! Roster management: an add/edit form plus delete with confirmation.

use tutor_types::{CreateStudentRequest, LetterGrade, Student, UpdateStudentRequest};

use crate::api::ApiClient;
use crate::error::ClientError;

pub const DELETE_CONFIRMATION: &str = "Are you sure you want to delete this student?";

/// Raw form inputs, as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentForm {
    pub name: String,
    pub age: String,
    pub class: String,
    pub overall_grade: String,
}

impl Default for StudentForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            age: String::new(),
            class: String::new(),
            overall_grade: LetterGrade::NotAvailable.to_string(),
        }
    }
}

impl StudentForm {
    pub fn from_student(student: &Student) -> Self {
        Self {
            name: student.name.clone(),
            age: student.age.to_string(),
            class: student.class.clone(),
            overall_grade: student.overall_grade.clone(),
        }
    }

    /// Unparseable age is sent as absent and left for the server to reject.
    fn age(&self) -> Option<i64> {
        self.age.trim().parse().ok()
    }

    pub fn to_create(&self) -> CreateStudentRequest {
        CreateStudentRequest {
            name: Some(self.name.clone()),
            age: self.age(),
            class: Some(self.class.clone()),
            overall_grade: Some(self.overall_grade.clone()),
        }
    }

    /// The whole form is sent; blank fields keep their stored value.
    pub fn to_update(&self) -> UpdateStudentRequest {
        UpdateStudentRequest {
            name: Some(self.name.clone()),
            age: self.age(),
            class: Some(self.class.clone()),
            overall_grade: Some(self.overall_grade.clone()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Add,
    Edit(i64),
}

#[derive(Debug, Default)]
pub struct RosterView {
    form: Option<(FormMode, StudentForm)>,
}

impl RosterView {
    pub fn is_form_open(&self) -> bool {
        self.form.is_some()
    }

    pub fn mode(&self) -> Option<FormMode> {
        self.form.as_ref().map(|(mode, _)| *mode)
    }

    pub fn form(&self) -> Option<&StudentForm> {
        self.form.as_ref().map(|(_, form)| form)
    }

    pub fn form_mut(&mut self) -> Option<&mut StudentForm> {
        self.form.as_mut().map(|(_, form)| form)
    }

    /// Open an empty form. Ignored while a form is already open.
    pub fn open_add(&mut self) -> bool {
        if self.form.is_some() {
            return false;
        }
        self.form = Some((FormMode::Add, StudentForm::default()));
        true
    }

    pub fn open_edit(&mut self, student: &Student) {
        self.form = Some((FormMode::Edit(student.id), StudentForm::from_student(student)));
    }

    pub fn cancel(&mut self) {
        self.form = None;
    }

    /// Create or update from the open form. `Ok(None)` when no form is open.
    ///
    /// The form closes on success and stays open with its inputs on error.
    pub async fn submit(&mut self, api: &ApiClient) -> Result<Option<Student>, ClientError> {
        let Some((mode, form)) = &self.form else {
            return Ok(None);
        };
        let saved = match mode {
            FormMode::Add => api.create_student(&form.to_create()).await?,
            FormMode::Edit(id) => api.update_student(*id, &form.to_update()).await?,
        };
        self.form = None;
        Ok(Some(saved))
    }

    /// Delete `id` once `confirm` agrees. Returns whether a request was sent.
    pub async fn delete(
        &self,
        api: &ApiClient,
        id: i64,
        confirm: impl FnOnce(&str) -> bool,
    ) -> Result<bool, ClientError> {
        if !confirm(DELETE_CONFIRMATION) {
            return Ok(false);
        }
        api.delete_student(id).await?;
        Ok(true)
    }
}
