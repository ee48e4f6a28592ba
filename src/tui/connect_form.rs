//! Connection form — host, user and password entry for the remote surface.
//!
//! The password lives only in this form and is wiped after every attempt.

/// Form fields in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Host,
    User,
    Password,
}

impl FormField {
    pub fn next(self) -> Self {
        match self {
            FormField::Host => FormField::User,
            FormField::User => FormField::Password,
            FormField::Password => FormField::Host,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            FormField::Host => FormField::Password,
            FormField::User => FormField::Host,
            FormField::Password => FormField::User,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FormField::Host => "IP:",
            FormField::User => "User:",
            FormField::Password => "Pass:",
        }
    }
}

/// Values handed to the remote sink on submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub host: String,
    pub user: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct ConnectForm {
    pub visible: bool,
    pub focus: FormField,
    host: String,
    user: String,
    password: String,
    /// Feedback line, e.g. `ENTER PASSWORD` or the last connect error.
    pub message: Option<String>,
}

impl ConnectForm {
    pub fn new(host: &str, user: &str) -> Self {
        Self {
            visible: false,
            focus: FormField::Password,
            host: host.to_string(),
            user: user.to_string(),
            password: String::new(),
            message: None,
        }
    }

    pub fn show(&mut self) {
        self.visible = true;
        self.message = None;
        self.focus = if self.host.trim().is_empty() {
            FormField::Host
        } else {
            FormField::Password
        };
    }

    pub fn hide(&mut self) {
        self.visible = false;
        self.password.clear();
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    /// Password as displayed: one `*` per character.
    pub fn masked_password(&self) -> String {
        "*".repeat(self.password.chars().count())
    }

    /// Displayed text of a field.
    pub fn display(&self, field: FormField) -> String {
        match field {
            FormField::Host => self.host.clone(),
            FormField::User => self.user.clone(),
            FormField::Password => self.masked_password(),
        }
    }

    fn field_mut(&mut self) -> &mut String {
        match self.focus {
            FormField::Host => &mut self.host,
            FormField::User => &mut self.user,
            FormField::Password => &mut self.password,
        }
    }

    pub fn insert(&mut self, c: char) {
        if !c.is_control() {
            self.field_mut().push(c);
        }
    }

    pub fn backspace(&mut self) {
        self.field_mut().pop();
    }

    pub fn next_field(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn prev_field(&mut self) {
        self.focus = self.focus.prev();
    }

    /// Take the entered credentials, clearing the password.
    ///
    /// With an empty password nothing is returned and the form asks for one.
    pub fn submit(&mut self) -> Option<Credentials> {
        if self.password.is_empty() {
            self.message = Some("ENTER PASSWORD".to_string());
            self.focus = FormField::Password;
            return None;
        }
        self.message = None;
        Some(Credentials {
            host: self.host.trim().to_string(),
            user: self.user.trim().to_string(),
            password: std::mem::take(&mut self.password),
        })
    }
}
