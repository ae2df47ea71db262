use std::{cell::RefCell, error::Error, fmt, rc::Rc, sync::LazyLock};

use regex::Regex;
use tracing::{Level, debug, info, instrument, trace, warn};

use crate::{
    config::ContactConfig,
    dom::{EventKind, Page, Target},
    notify::{NoticeKind, NotificationCenter},
    sched::Scheduler,
};

// local-part@domain.tld, with no whitespace or extra @ anywhere
pub const EMAIL_REGEX: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_REGEX).expect("email regex is valid"));

pub const SENT_MESSAGE: &str = "Message sent successfully! I'll get back to you soon.";

pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Field {
    Name,
    Email,
    Subject,
    Message,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Name, Field::Email, Field::Subject, Field::Message];

    // the form control's name attribute
    pub fn name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Subject => "subject",
            Self::Message => "message",
        }
    }
}

// display strings double as the user-facing notification text
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ContactError {
    MissingField(Field),
    InvalidEmail,
    MessageTooLong { max: usize },
}

impl fmt::Display for ContactError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField(_) => write!(f, "Please fill in all fields."),
            Self::InvalidEmail => write!(f, "Please enter a valid email address."),
            Self::MessageTooLong { max } => {
                write!(f, "Message is too long (maximum {max} characters).")
            }
        }
    }
}

impl Error for ContactError {}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactMessage {
    fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Subject => &self.subject,
            Field::Message => &self.message,
        }
    }

    // values are checked exactly as entered
    pub fn validate(&self, max_message_len: Option<usize>) -> Result<(), ContactError> {
        if let Some(field) = Field::ALL.into_iter().find(|f| self.get(*f).is_empty()) {
            return Err(ContactError::MissingField(field));
        }

        if !is_valid_email(&self.email) {
            return Err(ContactError::InvalidEmail);
        }

        if let Some(max) = max_message_len
            && self.message.chars().count() > max
        {
            return Err(ContactError::MessageTooLong { max });
        }

        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FormState {
    Idle,
    Submitting,
}

// the contact form never talks to a server: a valid submission disables the button for a
// fixed delay, then reports success and resets the form
pub struct ContactForm<P: Page, S: Scheduler> {
    page: Rc<P>,
    sched: Rc<S>,
    notices: Rc<NotificationCenter<P, S>>,
    config: ContactConfig,
    form: P::Element,
    state: FormState,
}

impl<P: Page, S: Scheduler> ContactForm<P, S> {
    #[instrument(level=Level::DEBUG, skip_all)]
    pub fn attach(
        page: Rc<P>,
        sched: Rc<S>,
        notices: Rc<NotificationCenter<P, S>>,
        config: &ContactConfig,
    ) -> Option<Rc<RefCell<Self>>> {
        let Some(form) = page.query(&config.form_selector) else {
            debug!("no contact form on page");
            return None;
        };

        let this = Rc::new(RefCell::new(ContactForm {
            page: page.clone(),
            sched,
            notices,
            config: config.clone(),
            form: form.clone(),
            state: FormState::Idle,
        }));

        // the completion task needs its own Rc, hence the associated fn
        let handle = this.clone();
        page.listen(
            Target::Element(form),
            EventKind::Submit,
            Box::new(move |event| {
                event.prevent_default();
                if let Err(err) = Self::submit(&handle) {
                    trace!("submit listener: {err}");
                }
            }),
        );

        debug!("contact form attached");
        Some(this)
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn read(&self) -> ContactMessage {
        ContactMessage {
            name: self.field_value(Field::Name),
            email: self.field_value(Field::Email),
            subject: self.field_value(Field::Subject),
            message: self.field_value(Field::Message),
        }
    }

    pub fn submit(this: &Rc<RefCell<Self>>) -> Result<(), ContactError> {
        let mut form = this.borrow_mut();

        if form.state == FormState::Submitting {
            debug!("submission already in flight, ignoring");
            return Ok(());
        }

        if let Err(err) = form.read().validate(form.config.max_message_len) {
            debug!("contact form rejected: {err:?}");
            form.notices.notify(&err.to_string(), NoticeKind::Error);
            return Err(err);
        }

        form.state = FormState::Submitting;
        let button = form.submit_button();
        let label = button.as_ref().map(|b| form.page.text(b));
        if let Some(button) = &button {
            form.page.set_text(button, &form.config.pending_label);
            form.page.set_disabled(button, true);
        }
        info!("contact form submitted");

        let handle = this.clone();
        form.sched.schedule(
            form.config.submit_delay_ms,
            Box::new(move || {
                handle
                    .borrow_mut()
                    .finish(button.zip(label));
            }),
        );

        Ok(())
    }

    fn finish(&mut self, button: Option<(P::Element, String)>) {
        self.notices.notify(SENT_MESSAGE, NoticeKind::Success);

        for field in Field::ALL {
            match self.field(field) {
                Some(el) => self.page.set_value(&el, ""),
                None => warn!("contact form lost its {} field", field.name()),
            }
        }

        if let Some((button, label)) = button {
            self.page.set_text(&button, &label);
            self.page.set_disabled(&button, false);
        }

        self.state = FormState::Idle;
        debug!("contact form reset");
    }

    fn field(&self, field: Field) -> Option<P::Element> {
        let selector = format!("[name=\"{}\"]", field.name());
        self.page.query_within(&self.form, &selector).into_iter().next()
    }

    fn field_value(&self, field: Field) -> String {
        self.field(field)
            .map(|el| self.page.value(&el))
            .unwrap_or_default()
    }

    fn submit_button(&self) -> Option<P::Element> {
        self.page
            .query_within(&self.form, &self.config.submit_selector)
            .into_iter()
            .next()
    }
}
