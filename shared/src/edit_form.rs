//! Customer / contact edit form.
//!
//! The form is driven by explicit calls from the hosting component: `open`
//! whenever the source record changes, `set_field` on input, `validate_field`
//! on blur and `submit` on save. The contact email uniqueness lookup is the only
//! async step. It is split into a synchronous `begin_*` half that hands out a
//! ticket and a `finish_*` half that applies the lookup result, so a host that
//! cannot hold `&mut` across an await (a Yew component) can drive it too.
//!
//! Every uniqueness check carries a ticket. Editing the email, starting a newer
//! check, reopening or closing the form invalidates older tickets, and a result
//! for an invalidated ticket is dropped without touching the error map.

use futures::future::join_all;
use tracing::{debug, warn};

use crate::error::{FormError, LookupError};
use crate::lookup::ContactEmailLookup;
use crate::validation::{
    humanize, is_valid_email, required_message, SubmitOutcome, TouchedSet, ValidationErrors,
    EMAIL_IN_USE_MESSAGE, EMAIL_UNVERIFIED_MESSAGE, INVALID_EMAIL_MESSAGE, SUBMIT_FAILED_MESSAGE,
    SUBMIT_FIELD,
};
use crate::{Contact, Customer};

/// Which record the edit form is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    Customer,
    Contact,
}

impl EditMode {
    /// Fields shown by the form, in display order
    pub fn fields(&self) -> &'static [EditField] {
        match self {
            EditMode::Customer => &[
                EditField::CompanyName,
                EditField::Industry,
                EditField::Address,
                EditField::Website,
                EditField::Email,
                EditField::Phone,
            ],
            EditMode::Contact => &[
                EditField::FirstName,
                EditField::LastName,
                EditField::Position,
                EditField::Email,
                EditField::Phone,
            ],
        }
    }

    pub fn required_fields(&self) -> &'static [EditField] {
        match self {
            EditMode::Customer => &[
                EditField::CompanyName,
                EditField::Industry,
                EditField::Address,
                EditField::Email,
                EditField::Phone,
            ],
            EditMode::Contact => &[
                EditField::FirstName,
                EditField::LastName,
                EditField::Email,
                EditField::Phone,
            ],
        }
    }

    pub fn is_required(&self, field: EditField) -> bool {
        self.required_fields().contains(&field)
    }

    pub fn noun(&self) -> &'static str {
        match self {
            EditMode::Customer => "Customer",
            EditMode::Contact => "Contact",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditField {
    CompanyName,
    Industry,
    Address,
    Website,
    FirstName,
    LastName,
    Position,
    Email,
    Phone,
}

impl EditField {
    /// Record field name, also used as the error map key
    pub fn name(&self) -> &'static str {
        match self {
            EditField::CompanyName => "company_name",
            EditField::Industry => "industry",
            EditField::Address => "address",
            EditField::Website => "website",
            EditField::FirstName => "first_name",
            EditField::LastName => "last_name",
            EditField::Position => "position",
            EditField::Email => "email",
            EditField::Phone => "phone",
        }
    }

    pub fn label(&self) -> String {
        humanize(self.name())
    }
}

/// Working copy of the record being edited
#[derive(Debug, Clone, PartialEq)]
pub enum EditDraft {
    Customer(Customer),
    Contact(Contact),
}

impl EditDraft {
    pub fn empty(mode: EditMode) -> Self {
        match mode {
            EditMode::Customer => EditDraft::Customer(Customer::default()),
            EditMode::Contact => EditDraft::Contact(Contact::default()),
        }
    }

    pub fn mode(&self) -> EditMode {
        match self {
            EditDraft::Customer(_) => EditMode::Customer,
            EditDraft::Contact(_) => EditMode::Contact,
        }
    }

    /// Record identifier; 0 for a record that has not been created yet
    pub fn id(&self) -> i64 {
        match self {
            EditDraft::Customer(customer) => customer.customer_id,
            EditDraft::Contact(contact) => contact.contact_id,
        }
    }

    pub fn is_new(&self) -> bool {
        self.id() == 0
    }

    /// Current value of `field`, or `None` if this record kind has no such field
    pub fn value(&self, field: EditField) -> Option<&str> {
        let value = match (self, field) {
            (EditDraft::Customer(c), EditField::CompanyName) => &c.company_name,
            (EditDraft::Customer(c), EditField::Industry) => &c.industry,
            (EditDraft::Customer(c), EditField::Address) => &c.address,
            (EditDraft::Customer(c), EditField::Website) => &c.website,
            (EditDraft::Customer(c), EditField::Email) => &c.email,
            (EditDraft::Customer(c), EditField::Phone) => &c.phone,
            (EditDraft::Contact(c), EditField::FirstName) => &c.first_name,
            (EditDraft::Contact(c), EditField::LastName) => &c.last_name,
            (EditDraft::Contact(c), EditField::Position) => &c.position,
            (EditDraft::Contact(c), EditField::Email) => &c.email,
            (EditDraft::Contact(c), EditField::Phone) => &c.phone,
            _ => return None,
        };
        Some(value.as_str())
    }

    fn value_mut(&mut self, field: EditField) -> Option<&mut String> {
        let value = match (self, field) {
            (EditDraft::Customer(c), EditField::CompanyName) => &mut c.company_name,
            (EditDraft::Customer(c), EditField::Industry) => &mut c.industry,
            (EditDraft::Customer(c), EditField::Address) => &mut c.address,
            (EditDraft::Customer(c), EditField::Website) => &mut c.website,
            (EditDraft::Customer(c), EditField::Email) => &mut c.email,
            (EditDraft::Customer(c), EditField::Phone) => &mut c.phone,
            (EditDraft::Contact(c), EditField::FirstName) => &mut c.first_name,
            (EditDraft::Contact(c), EditField::LastName) => &mut c.last_name,
            (EditDraft::Contact(c), EditField::Position) => &mut c.position,
            (EditDraft::Contact(c), EditField::Email) => &mut c.email,
            (EditDraft::Contact(c), EditField::Phone) => &mut c.phone,
            _ => return None,
        };
        Some(value)
    }
}

/// An email uniqueness lookup that has been started but not yet applied
#[derive(Debug, Clone, PartialEq)]
pub struct PendingEmailCheck {
    ticket: u64,
    email: String,
}

impl PendingEmailCheck {
    pub fn email(&self) -> &str {
        &self.email
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmailCheckResult {
    pub check: PendingEmailCheck,
    pub result: Result<bool, LookupError>,
}

/// Outcome of the synchronous half of a field validation
#[derive(Debug, Clone, PartialEq)]
pub enum FieldCheck {
    Complete(bool),
    /// Local rules passed; the lookup must run before the field is known valid
    Uniqueness(PendingEmailCheck),
}

/// Work left over after `begin_submit` accepted a submit
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitPlan {
    pub checks: Vec<PendingEmailCheck>,
    pub locally_valid: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitStart {
    Ready(SubmitPlan),
    Finished(SubmitOutcome<EditDraft>),
}

/// Run the given lookups concurrently
pub async fn run_email_checks<L>(lookup: &L, checks: Vec<PendingEmailCheck>) -> Vec<EmailCheckResult>
where
    L: ContactEmailLookup + ?Sized,
{
    join_all(checks.into_iter().map(|check| async move {
        let result = lookup.email_exists(&check.email).await;
        EmailCheckResult { check, result }
    }))
    .await
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditFormState {
    is_open: bool,
    mode: EditMode,
    draft: EditDraft,
    /// Email of the contact as it was when the form was opened
    original_email: Option<String>,
    errors: ValidationErrors,
    touched: TouchedSet,
    is_saving: bool,
    checking_email: bool,
    email_ticket: u64,
}

impl EditFormState {
    pub fn new(mode: EditMode) -> Self {
        Self {
            is_open: false,
            mode,
            draft: EditDraft::empty(mode),
            original_email: None,
            errors: ValidationErrors::new(),
            touched: TouchedSet::new(),
            is_saving: false,
            checking_email: false,
            email_ticket: 0,
        }
    }

    /// Show the form for `record`, or for a new record when `None`
    pub fn open(&mut self, mode: EditMode, record: Option<EditDraft>) {
        self.reset(mode, record);
        self.is_open = true;
    }

    /// Replace the draft with a copy of `record` and forget all validation state
    pub fn reset(&mut self, mode: EditMode, record: Option<EditDraft>) {
        let record = match record {
            Some(record) if record.mode() != mode => {
                warn!(
                    "Ignoring {} record passed to {} form",
                    record.mode().noun(),
                    mode.noun()
                );
                None
            }
            other => other,
        };

        self.original_email = match &record {
            Some(EditDraft::Contact(contact)) => Some(contact.email.clone()),
            _ => None,
        };
        self.mode = mode;
        self.draft = record.unwrap_or_else(|| EditDraft::empty(mode));
        self.errors.clear();
        self.touched.clear();
        self.is_saving = false;
        self.invalidate_email_checks();
    }

    /// Hide the form and discard the draft
    pub fn close(&mut self) {
        self.reset(self.mode, None);
        self.is_open = false;
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn draft(&self) -> &EditDraft {
        &self.draft
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn touched(&self) -> &TouchedSet {
        &self.touched
    }

    pub fn is_saving(&self) -> bool {
        self.is_saving
    }

    pub fn is_checking_email(&self) -> bool {
        self.checking_email
    }

    /// Error for `field`, only once the user has touched it
    pub fn visible_error(&self, field: EditField) -> Option<&str> {
        if self.touched.is_touched(field.name()) {
            self.errors.get(field.name())
        } else {
            None
        }
    }

    pub fn submit_error(&self) -> Option<&str> {
        self.errors.get(SUBMIT_FIELD)
    }

    pub fn set_field(&mut self, field: EditField, value: impl Into<String>) {
        match self.draft.value_mut(field) {
            Some(slot) => *slot = value.into(),
            None => {
                debug!("{} form has no field {}", self.mode.noun(), field.name());
                return;
            }
        }
        if field == EditField::Email {
            self.invalidate_email_checks();
        }
    }

    /// Synchronous half of field validation. Marks the field touched.
    pub fn begin_field_check(&mut self, field: EditField) -> FieldCheck {
        let name = field.name();
        self.touched.touch(name);

        if !self.mode.is_required(field) {
            self.errors.remove(name);
            return FieldCheck::Complete(true);
        }

        let value = self.draft.value(field).unwrap_or_default().trim().to_string();
        if value.is_empty() {
            self.errors.set(name, required_message(name));
            return FieldCheck::Complete(false);
        }

        if field == EditField::Email {
            if !is_valid_email(&value) {
                self.errors.set(name, INVALID_EMAIL_MESSAGE);
                return FieldCheck::Complete(false);
            }
            if self.mode == EditMode::Contact {
                self.email_ticket += 1;
                self.checking_email = true;
                return FieldCheck::Uniqueness(PendingEmailCheck {
                    ticket: self.email_ticket,
                    email: value,
                });
            }
        }

        self.errors.remove(name);
        FieldCheck::Complete(true)
    }

    /// Apply a lookup result. Returns `None` when the check was superseded.
    pub fn finish_email_check(&mut self, outcome: EmailCheckResult) -> Option<bool> {
        let EmailCheckResult { check, result } = outcome;
        if check.ticket != self.email_ticket {
            debug!("Discarding superseded email check for {}", check.email);
            return None;
        }
        self.checking_email = false;

        let name = EditField::Email.name();
        match result {
            Ok(true) if self.original_email.as_deref() != Some(check.email.as_str()) => {
                self.errors.set(name, EMAIL_IN_USE_MESSAGE);
                Some(false)
            }
            Ok(_) => {
                self.errors.remove(name);
                Some(true)
            }
            Err(e) => {
                warn!("Email uniqueness check failed for {}: {}", check.email, e);
                self.errors.set(name, EMAIL_UNVERIFIED_MESSAGE);
                Some(false)
            }
        }
    }

    /// Validate one field, awaiting the uniqueness lookup when needed
    pub async fn validate_field<L>(&mut self, field: EditField, lookup: &L) -> bool
    where
        L: ContactEmailLookup + ?Sized,
    {
        match self.begin_field_check(field) {
            FieldCheck::Complete(valid) => valid,
            FieldCheck::Uniqueness(check) => {
                let result = lookup.email_exists(check.email()).await;
                self.finish_email_check(EmailCheckResult { check, result })
                    .unwrap_or(false)
            }
        }
    }

    /// Synchronous half of submit: guards re-entry and validates every required field
    pub fn begin_submit(&mut self) -> SubmitStart {
        if self.is_saving {
            debug!("{} save already in progress", self.mode.noun());
            return SubmitStart::Finished(SubmitOutcome::Ignored);
        }
        if !self.is_open {
            return SubmitStart::Finished(self.fail(FormError::Closed));
        }

        self.is_saving = true;
        self.errors.remove(SUBMIT_FIELD);

        let mut plan = SubmitPlan {
            checks: Vec::new(),
            locally_valid: true,
        };
        for field in self.mode.required_fields() {
            match self.begin_field_check(*field) {
                FieldCheck::Complete(valid) => plan.locally_valid &= valid,
                FieldCheck::Uniqueness(check) => plan.checks.push(check),
            }
        }
        SubmitStart::Ready(plan)
    }

    /// Apply the lookups of a submit and decide whether to save.
    ///
    /// A superseded lookup counts as invalid: the email changed while saving.
    pub fn finish_submit(
        &mut self,
        locally_valid: bool,
        results: Vec<EmailCheckResult>,
    ) -> SubmitOutcome<EditDraft> {
        let mut valid = locally_valid;
        for result in results {
            valid &= self.finish_email_check(result).unwrap_or(false);
        }
        self.is_saving = false;

        if valid {
            debug!("{} {} passed validation", self.mode.noun(), self.draft.id());
            SubmitOutcome::Saved(self.draft.clone())
        } else {
            debug!("{} save blocked by {} field error(s)", self.mode.noun(), self.errors.len());
            SubmitOutcome::Invalid
        }
    }

    pub async fn submit<L>(&mut self, lookup: &L) -> SubmitOutcome<EditDraft>
    where
        L: ContactEmailLookup + ?Sized,
    {
        match self.begin_submit() {
            SubmitStart::Finished(outcome) => outcome,
            SubmitStart::Ready(plan) => {
                let results = run_email_checks(lookup, plan.checks).await;
                self.finish_submit(plan.locally_valid, results)
            }
        }
    }

    fn fail(&mut self, error: FormError) -> SubmitOutcome<EditDraft> {
        warn!("{} save failed: {}", self.mode.noun(), error);
        self.is_saving = false;
        self.errors.set(SUBMIT_FIELD, SUBMIT_FAILED_MESSAGE);
        SubmitOutcome::Failed
    }

    fn invalidate_email_checks(&mut self) {
        self.email_ticket += 1;
        self.checking_email = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::cell::{Cell, RefCell};

    /// Lookup double that answers from a fixed list of taken emails
    struct ScriptedLookup {
        taken: Vec<String>,
        fail: bool,
        calls: Cell<usize>,
        seen: RefCell<Vec<String>>,
    }

    impl ScriptedLookup {
        fn with_taken(taken: &[&str]) -> Self {
            Self {
                taken: taken.iter().map(|email| email.to_string()).collect(),
                fail: false,
                calls: Cell::new(0),
                seen: RefCell::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::with_taken(&[])
            }
        }
    }

    #[async_trait(?Send)]
    impl ContactEmailLookup for ScriptedLookup {
        async fn email_exists(&self, email: &str) -> Result<bool, LookupError> {
            self.calls.set(self.calls.get() + 1);
            self.seen.borrow_mut().push(email.to_string());
            if self.fail {
                return Err(LookupError::Request("connection refused".to_string()));
            }
            Ok(self.taken.iter().any(|taken| taken == email))
        }
    }

    fn contact(id: i64, email: &str) -> Contact {
        Contact {
            contact_id: id,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            position: "Engineer".to_string(),
            email: email.to_string(),
            phone: "555-0100".to_string(),
        }
    }

    fn customer(id: i64) -> Customer {
        Customer {
            customer_id: id,
            company_name: "Acme".to_string(),
            industry: "Manufacturing".to_string(),
            address: "1 Main St".to_string(),
            website: String::new(),
            email: "orders@acme.com".to_string(),
            phone: "555-0199".to_string(),
        }
    }

    fn open_contact(record: Option<Contact>) -> EditFormState {
        let mut form = EditFormState::new(EditMode::Contact);
        form.open(EditMode::Contact, record.map(EditDraft::Contact));
        form
    }

    #[tokio::test]
    async fn test_empty_customer_submit_reports_every_required_field() {
        let lookup = ScriptedLookup::with_taken(&[]);
        let mut form = EditFormState::new(EditMode::Customer);
        form.open(EditMode::Customer, None);

        let outcome = form.submit(&lookup).await;

        assert_eq!(outcome, SubmitOutcome::Invalid);
        assert_eq!(form.errors().len(), 5);
        assert_eq!(form.errors().get("company_name"), Some("Company Name is required"));
        assert_eq!(form.errors().get("industry"), Some("Industry is required"));
        assert_eq!(form.errors().get("address"), Some("Address is required"));
        assert_eq!(form.errors().get("email"), Some("Email is required"));
        assert_eq!(form.errors().get("phone"), Some("Phone is required"));
        assert!(!form.errors().contains("website"));
        assert!(form.submit_error().is_none());
        assert_eq!(lookup.calls.get(), 0);
        assert!(!form.is_saving());
    }

    #[tokio::test]
    async fn test_empty_contact_submit_reports_required_fields() {
        let lookup = ScriptedLookup::with_taken(&[]);
        let mut form = open_contact(None);

        assert_eq!(form.submit(&lookup).await, SubmitOutcome::Invalid);
        assert_eq!(form.errors().len(), 4);
        assert_eq!(form.errors().get("first_name"), Some("First Name is required"));
        assert_eq!(form.errors().get("last_name"), Some("Last Name is required"));
        assert!(!form.errors().contains("position"));
        // Format fails before any lookup is attempted
        assert_eq!(lookup.calls.get(), 0);
    }

    #[tokio::test]
    async fn test_email_format() {
        let lookup = ScriptedLookup::with_taken(&[]);
        let mut form = EditFormState::new(EditMode::Customer);
        form.open(EditMode::Customer, Some(EditDraft::Customer(customer(1))));

        form.set_field(EditField::Email, "a@b");
        assert!(!form.validate_field(EditField::Email, &lookup).await);
        assert_eq!(form.errors().get("email"), Some(INVALID_EMAIL_MESSAGE));

        form.set_field(EditField::Email, "a@b.com");
        assert!(form.validate_field(EditField::Email, &lookup).await);
        assert!(!form.errors().contains("email"));
        // Customer emails are never checked for uniqueness
        assert_eq!(lookup.calls.get(), 0);
    }

    #[tokio::test]
    async fn test_contact_email_already_in_use() {
        let lookup = ScriptedLookup::with_taken(&["taken@acme.com"]);
        let mut form = open_contact(Some(contact(3, "ada@acme.com")));

        form.set_field(EditField::Email, "taken@acme.com");
        assert!(!form.validate_field(EditField::Email, &lookup).await);
        assert_eq!(form.errors().get("email"), Some(EMAIL_IN_USE_MESSAGE));
        assert_eq!(lookup.seen.borrow().as_slice(), ["taken@acme.com"]);
    }

    #[tokio::test]
    async fn test_contact_keeping_its_own_email_is_not_a_conflict() {
        let lookup = ScriptedLookup::with_taken(&["ada@acme.com"]);
        let mut form = open_contact(Some(contact(3, "ada@acme.com")));

        assert!(form.validate_field(EditField::Email, &lookup).await);
        assert!(!form.errors().contains("email"));
        assert_eq!(lookup.calls.get(), 1);
    }

    #[tokio::test]
    async fn test_lookup_failure_is_fail_closed() {
        let lookup = ScriptedLookup::failing();
        let mut form = open_contact(Some(contact(3, "ada@acme.com")));

        assert!(!form.validate_field(EditField::Email, &lookup).await);
        assert_eq!(form.errors().get("email"), Some(EMAIL_UNVERIFIED_MESSAGE));
        assert!(!form.is_checking_email());

        let outcome = form.submit(&lookup).await;
        assert_eq!(outcome, SubmitOutcome::Invalid);
        assert!(form.submit_error().is_none());
    }

    #[tokio::test]
    async fn test_valid_new_contact_is_saved_with_zero_id() {
        let lookup = ScriptedLookup::with_taken(&["someone@acme.com"]);
        let mut form = open_contact(None);
        form.set_field(EditField::FirstName, "Grace");
        form.set_field(EditField::LastName, "Hopper");
        form.set_field(EditField::Email, "grace@acme.com");
        form.set_field(EditField::Phone, "555-0142");

        let draft = form.submit(&lookup).await.saved().expect("draft should be saved");

        assert!(draft.is_new());
        assert_eq!(draft.value(EditField::FirstName), Some("Grace"));
        assert_eq!(draft.value(EditField::Position), Some(""));
        assert!(form.errors().is_empty());
        assert!(form.is_open());
        assert!(!form.is_saving());
    }

    #[tokio::test]
    async fn test_existing_customer_is_saved_with_its_id() {
        let lookup = ScriptedLookup::with_taken(&[]);
        let mut form = EditFormState::new(EditMode::Customer);
        form.open(EditMode::Customer, Some(EditDraft::Customer(customer(12))));
        form.set_field(EditField::Website, "https://acme.com");

        match form.submit(&lookup).await {
            SubmitOutcome::Saved(EditDraft::Customer(saved)) => {
                assert_eq!(saved.customer_id, 12);
                assert_eq!(saved.website, "https://acme.com");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_reentrant_submit_is_ignored() {
        let mut form = open_contact(Some(contact(3, "ada@acme.com")));

        let first = form.begin_submit();
        assert!(matches!(first, SubmitStart::Ready(ref plan) if plan.checks.len() == 1));
        assert!(form.is_saving());

        let errors_before = form.errors().clone();
        let second = form.begin_submit();
        assert_eq!(second, SubmitStart::Finished(SubmitOutcome::Ignored));
        assert_eq!(form.errors(), &errors_before);
    }

    #[tokio::test]
    async fn test_submit_on_closed_form_sets_submit_error() {
        let lookup = ScriptedLookup::with_taken(&[]);
        let mut form = EditFormState::new(EditMode::Customer);

        assert_eq!(form.submit(&lookup).await, SubmitOutcome::Failed);
        assert_eq!(form.submit_error(), Some(SUBMIT_FAILED_MESSAGE));
        assert!(!form.is_saving());
    }

    #[test]
    fn test_superseded_check_is_discarded() {
        let mut form = open_contact(Some(contact(3, "ada@acme.com")));
        form.set_field(EditField::Email, "old@acme.com");

        let stale = match form.begin_field_check(EditField::Email) {
            FieldCheck::Uniqueness(check) => check,
            other => panic!("expected a lookup, got {:?}", other),
        };
        assert!(form.is_checking_email());

        form.set_field(EditField::Email, "new@acme.com");
        assert!(!form.is_checking_email());

        let applied = form.finish_email_check(EmailCheckResult {
            check: stale,
            result: Ok(true),
        });
        assert_eq!(applied, None);
        assert!(!form.errors().contains("email"));
    }

    #[test]
    fn test_newer_check_wins_over_late_older_result() {
        let mut form = open_contact(Some(contact(3, "ada@acme.com")));
        form.set_field(EditField::Email, "taken@acme.com");

        let older = match form.begin_field_check(EditField::Email) {
            FieldCheck::Uniqueness(check) => check,
            other => panic!("expected a lookup, got {:?}", other),
        };
        let newer = match form.begin_field_check(EditField::Email) {
            FieldCheck::Uniqueness(check) => check,
            other => panic!("expected a lookup, got {:?}", other),
        };

        let newer_applied = form.finish_email_check(EmailCheckResult {
            check: newer,
            result: Ok(false),
        });
        assert_eq!(newer_applied, Some(true));

        let older_applied = form.finish_email_check(EmailCheckResult {
            check: older,
            result: Ok(true),
        });
        assert_eq!(older_applied, None);
        assert!(!form.errors().contains("email"));
    }

    #[test]
    fn test_email_edit_during_submit_blocks_save() {
        let mut form = open_contact(Some(contact(3, "ada@acme.com")));
        let plan = match form.begin_submit() {
            SubmitStart::Ready(plan) => plan,
            other => panic!("expected a plan, got {:?}", other),
        };

        form.set_field(EditField::Email, "changed@acme.com");
        let results = plan
            .checks
            .into_iter()
            .map(|check| EmailCheckResult { check, result: Ok(false) })
            .collect();

        assert_eq!(form.finish_submit(plan.locally_valid, results), SubmitOutcome::Invalid);
        assert!(!form.is_saving());
    }

    #[tokio::test]
    async fn test_reopening_replaces_draft_and_clears_state() {
        let lookup = ScriptedLookup::with_taken(&[]);
        let mut form = open_contact(None);
        form.submit(&lookup).await;
        assert!(!form.errors().is_empty());
        assert!(!form.touched().is_empty());

        form.open(EditMode::Contact, Some(EditDraft::Contact(contact(9, "ada@acme.com"))));

        assert!(form.errors().is_empty());
        assert!(form.touched().is_empty());
        assert_eq!(form.draft().id(), 9);
        assert_eq!(form.draft().value(EditField::Email), Some("ada@acme.com"));
    }

    #[test]
    fn test_close_discards_draft() {
        let mut form = EditFormState::new(EditMode::Customer);
        form.open(EditMode::Customer, Some(EditDraft::Customer(customer(4))));
        form.begin_field_check(EditField::Email);
        form.set_field(EditField::CompanyName, "");
        form.begin_field_check(EditField::CompanyName);

        form.close();

        assert!(!form.is_open());
        assert_eq!(form.draft(), &EditDraft::empty(EditMode::Customer));
        assert!(form.errors().is_empty());
        assert!(form.touched().is_empty());
    }

    #[test]
    fn test_mismatched_record_opens_blank_form() {
        let mut form = EditFormState::new(EditMode::Contact);
        form.open(EditMode::Contact, Some(EditDraft::Customer(customer(4))));

        assert_eq!(form.mode(), EditMode::Contact);
        assert_eq!(form.draft(), &EditDraft::empty(EditMode::Contact));
    }

    #[test]
    fn test_validation_never_changes_identifier() {
        let mut form = open_contact(Some(contact(21, "ada@acme.com")));
        form.set_field(EditField::FirstName, "");
        for field in EditMode::Contact.fields() {
            form.begin_field_check(*field);
        }
        assert_eq!(form.draft().id(), 21);
    }

    #[test]
    fn test_errors_are_visible_only_once_touched() {
        let mut form = EditFormState::new(EditMode::Customer);
        form.open(EditMode::Customer, None);
        assert_eq!(form.visible_error(EditField::Phone), None);

        form.begin_field_check(EditField::Phone);
        assert_eq!(form.visible_error(EditField::Phone), Some("Phone is required"));
        assert_eq!(form.visible_error(EditField::CompanyName), None);
    }

    #[test]
    fn test_fields_outside_the_mode_are_ignored() {
        let mut form = EditFormState::new(EditMode::Customer);
        form.open(EditMode::Customer, None);
        form.set_field(EditField::FirstName, "Ada");

        assert_eq!(form.draft().value(EditField::FirstName), None);
        assert_eq!(form.begin_field_check(EditField::FirstName), FieldCheck::Complete(true));
    }
}
