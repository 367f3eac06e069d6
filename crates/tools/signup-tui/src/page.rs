//! Signup page state and key handling.
//!
//! Nothing here performs I/O. A key press mutates the form and focus and may
//! ask the run loop to dispatch an action; action reports are folded back in
//! through [`SignupPage::apply_report`].

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use signup_core::{
    ActionKind, ActionOutcome, ActionReport, ActionRequest, SignupField, SignupForm,
};
use std::collections::{HashSet, VecDeque};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Field(SignupField),
    Submit,
}

impl Focus {
    const ORDER: [Focus; 7] = [
        Focus::Field(SignupField::Id),
        Focus::Field(SignupField::Email),
        Focus::Field(SignupField::EmailConfirm),
        Focus::Field(SignupField::Password),
        Focus::Field(SignupField::PasswordConfirm),
        Focus::Field(SignupField::Agree),
        Focus::Submit,
    ];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        let len = Self::ORDER.len();
        Self::ORDER[(self.position() + len - 1) % len]
    }

    pub fn field(self) -> Option<SignupField> {
        match self {
            Focus::Field(field) => Some(field),
            Focus::Submit => None,
        }
    }
}

/// The side action bound to a field's button, if it has one.
pub fn side_action(field: SignupField) -> Option<ActionKind> {
    match field {
        SignupField::Id => Some(ActionKind::CheckUserId),
        SignupField::Email => Some(ActionKind::SendEmailCode),
        SignupField::EmailConfirm => Some(ActionKind::VerifyEmailCode),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageCommand {
    None,
    Dispatch(ActionRequest),
    Quit,
}

pub struct SignupPage {
    form: SignupForm,
    focus: Focus,
    alerts: VecDeque<String>,
    pending: HashSet<ActionKind>,
}

impl SignupPage {
    pub fn new(form: SignupForm) -> Self {
        Self {
            form,
            focus: Focus::Field(SignupField::Id),
            alerts: VecDeque::new(),
            pending: HashSet::new(),
        }
    }

    pub fn form(&self) -> &SignupForm {
        &self.form
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    /// The alert currently shown, oldest first.
    pub fn alert(&self) -> Option<&str> {
        self.alerts.front().map(String::as_str)
    }

    pub fn queued_alerts(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_pending(&self, kind: ActionKind) -> bool {
        self.pending.contains(&kind)
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> PageCommand {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') => PageCommand::Quit,
                KeyCode::Char('s') if self.alerts.is_empty() => self.submit(),
                _ => PageCommand::None,
            };
        }

        // The alert popup is modal.
        if !self.alerts.is_empty() {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                self.alerts.pop_front();
            }
            return PageCommand::None;
        }

        match key.code {
            KeyCode::Esc => PageCommand::Quit,
            KeyCode::Tab | KeyCode::Down => {
                self.move_focus(self.focus.next());
                PageCommand::None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.move_focus(self.focus.prev());
                PageCommand::None
            }
            KeyCode::Enter => self.activate(),
            KeyCode::Char(' ') if self.focus == Focus::Field(SignupField::Agree) => {
                self.form.toggle_agree();
                PageCommand::None
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::ALT) => {
                self.edit(|form, field| form.push_char(field, c));
                PageCommand::None
            }
            KeyCode::Backspace => {
                self.edit(|form, field| form.pop_char(field));
                PageCommand::None
            }
            _ => PageCommand::None,
        }
    }

    /// Folds the outcome of a finished action back into the page.
    pub fn apply_report(&mut self, report: ActionReport) {
        self.pending.remove(&report.kind);

        if let Some(message) = report.outcome.user_message() {
            self.alerts.push_back(message.to_string());
        }

        if report.kind == ActionKind::SubmitSignup
            && matches!(report.outcome, ActionOutcome::Alert(_))
        {
            debug!("Signup accepted, clearing the draft");
            self.form.reset();
            self.focus = Focus::Field(SignupField::Id);
        }
    }

    fn move_focus(&mut self, to: Focus) {
        if let Some(field) = self.focus.field() {
            self.form.blur(field);
        }
        self.focus = to;
    }

    fn activate(&mut self) -> PageCommand {
        match self.focus {
            Focus::Submit => self.submit(),
            Focus::Field(SignupField::Agree) => {
                self.form.toggle_agree();
                PageCommand::None
            }
            Focus::Field(field) => match side_action(field) {
                Some(kind) => self.trigger(kind),
                None => {
                    self.move_focus(self.focus.next());
                    PageCommand::None
                }
            },
        }
    }

    fn edit<F>(&mut self, apply: F)
    where
        F: FnOnce(&mut SignupForm, SignupField) -> signup_core::FormResult<()>,
    {
        let Some(field) = self.focus.field().filter(|f| f.is_text()) else {
            return;
        };
        if let Err(e) = apply(&mut self.form, field) {
            warn!(?field, error = %e, "Edit rejected");
        }
    }

    /// Builds the request from the draft as it is right now.
    fn trigger(&mut self, kind: ActionKind) -> PageCommand {
        let draft = self.form.draft();
        let request = match kind {
            ActionKind::CheckUserId => ActionRequest::check_user_id(draft),
            ActionKind::SendEmailCode => ActionRequest::send_email_code(draft),
            ActionKind::VerifyEmailCode => ActionRequest::verify_email_code(draft),
            ActionKind::SubmitSignup => return self.submit(),
        };
        self.pending.insert(kind);
        PageCommand::Dispatch(request)
    }

    fn submit(&mut self) -> PageCommand {
        match self.form.handle_submit() {
            Ok(payload) => {
                self.pending.insert(ActionKind::SubmitSignup);
                PageCommand::Dispatch(ActionRequest::submit_signup(payload))
            }
            Err(errors) => {
                if let Some(first) = errors.first() {
                    self.focus = Focus::Field(first.field);
                }
                PageCommand::None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use signup_core::{SignupPayload, ValidationError, ValidationMode, ValidationRules};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_str(page: &mut SignupPage, text: &str) {
        for c in text.chars() {
            page.handle_key(key(KeyCode::Char(c)));
        }
    }

    fn filled_page() -> SignupPage {
        let mut page = SignupPage::new(SignupForm::default());
        type_str(&mut page, "abc123");
        page.handle_key(key(KeyCode::Tab));
        type_str(&mut page, "user@example.com");
        page.handle_key(key(KeyCode::Tab));
        type_str(&mut page, "482913");
        page.handle_key(key(KeyCode::Tab));
        type_str(&mut page, "password1");
        page.handle_key(key(KeyCode::Tab));
        type_str(&mut page, "password1");
        page.handle_key(key(KeyCode::Tab));
        page.handle_key(key(KeyCode::Char(' ')));
        page
    }

    fn report(kind: ActionKind, outcome: ActionOutcome) -> ActionReport {
        ActionReport {
            kind,
            generation: 1,
            outcome,
        }
    }

    #[test]
    fn test_focus_wraps() {
        assert_eq!(Focus::Submit.next(), Focus::Field(SignupField::Id));
        assert_eq!(Focus::Field(SignupField::Id).prev(), Focus::Submit);
        assert_eq!(
            Focus::Field(SignupField::Password).next(),
            Focus::Field(SignupField::PasswordConfirm)
        );
    }

    #[test]
    fn test_typing_and_backspace() {
        let mut page = SignupPage::new(SignupForm::default());
        type_str(&mut page, "abc1234");
        page.handle_key(key(KeyCode::Backspace));
        assert_eq!(page.form().value(SignupField::Id), "abc123");
    }

    #[test]
    fn test_leaving_a_field_blurs_it() {
        let form = SignupForm::new(ValidationRules::default(), ValidationMode::OnBlur);
        let mut page = SignupPage::new(form);
        type_str(&mut page, "ab");
        assert!(page.form().state(SignupField::Id).is_untouched());

        page.handle_key(key(KeyCode::Down));
        assert_eq!(page.focus(), Focus::Field(SignupField::Email));
        assert!(matches!(
            page.form().error(SignupField::Id),
            Some(ValidationError::IdFormat { .. })
        ));
    }

    #[test]
    fn test_enter_runs_side_action_with_current_values() {
        let mut page = SignupPage::new(SignupForm::default());
        type_str(&mut page, "abc123");

        let command = page.handle_key(key(KeyCode::Enter));
        assert_eq!(
            command,
            PageCommand::Dispatch(ActionRequest::CheckUserId {
                user_id: "abc123".to_string()
            })
        );
        assert!(page.is_pending(ActionKind::CheckUserId));

        // Empty email still dispatches; the action answers with a prompt.
        page.handle_key(key(KeyCode::Tab));
        let command = page.handle_key(key(KeyCode::Enter));
        assert_eq!(
            command,
            PageCommand::Dispatch(ActionRequest::SendEmailCode {
                email: String::new()
            })
        );
    }

    #[test]
    fn test_enter_on_password_moves_on() {
        let mut page = SignupPage::new(SignupForm::default());
        for _ in 0..3 {
            page.handle_key(key(KeyCode::Tab));
        }
        assert_eq!(page.focus(), Focus::Field(SignupField::Password));
        assert_eq!(page.handle_key(key(KeyCode::Enter)), PageCommand::None);
        assert_eq!(page.focus(), Focus::Field(SignupField::PasswordConfirm));
    }

    #[test]
    fn test_checkbox_ignores_typing() {
        let mut page = SignupPage::new(SignupForm::default());
        page.handle_key(key(KeyCode::BackTab));
        page.handle_key(key(KeyCode::BackTab));
        assert_eq!(page.focus(), Focus::Field(SignupField::Agree));

        page.handle_key(key(KeyCode::Char('x')));
        assert!(!page.form().agree());
        page.handle_key(key(KeyCode::Enter));
        assert!(page.form().agree());
        page.handle_key(key(KeyCode::Char(' ')));
        assert!(!page.form().agree());
    }

    #[test]
    fn test_invalid_submit_focuses_first_error() {
        let mut page = filled_page();
        // untick the agreement
        page.handle_key(key(KeyCode::Char(' ')));

        assert_eq!(page.handle_key(ctrl('s')), PageCommand::None);
        assert_eq!(page.focus(), Focus::Field(SignupField::Agree));
        assert!(!page.is_pending(ActionKind::SubmitSignup));
    }

    #[test]
    fn test_valid_submit_dispatches_payload() {
        let mut page = filled_page();
        page.handle_key(key(KeyCode::Tab));
        assert_eq!(page.focus(), Focus::Submit);

        let command = page.handle_key(key(KeyCode::Enter));
        assert_eq!(
            command,
            PageCommand::Dispatch(ActionRequest::SubmitSignup(SignupPayload {
                user_id: "abc123".to_string(),
                user_pw: "password1".to_string(),
                email: "user@example.com".to_string(),
            }))
        );
        assert!(page.is_pending(ActionKind::SubmitSignup));
    }

    #[test]
    fn test_signup_alert_resets_form_without_leaving() {
        let mut page = filled_page();
        page.handle_key(ctrl('s'));

        page.apply_report(report(
            ActionKind::SubmitSignup,
            ActionOutcome::Alert("가입 완료".to_string()),
        ));
        assert_eq!(page.alert(), Some("가입 완료"));
        assert_eq!(page.form().value(SignupField::Id), "");
        assert!(!page.form().agree());
        assert!(!page.form().is_submitted());
        assert!(!page.is_pending(ActionKind::SubmitSignup));

        // first Esc closes the alert, the second leaves the page
        assert_eq!(page.handle_key(key(KeyCode::Esc)), PageCommand::None);
        assert_eq!(page.alert(), None);
        assert_eq!(page.handle_key(key(KeyCode::Esc)), PageCommand::Quit);
    }

    #[test]
    fn test_failed_action_shows_nothing() {
        let mut page = SignupPage::new(SignupForm::default());
        type_str(&mut page, "abc123");
        page.handle_key(key(KeyCode::Enter));

        page.apply_report(report(ActionKind::CheckUserId, ActionOutcome::Failed));
        assert_eq!(page.alert(), None);
        assert!(!page.is_pending(ActionKind::CheckUserId));
        assert_eq!(page.form().value(SignupField::Id), "abc123");
    }

    #[test]
    fn test_alerts_queue_and_block_input() {
        let mut page = SignupPage::new(SignupForm::default());
        page.apply_report(report(
            ActionKind::SendEmailCode,
            ActionOutcome::Prompt("이메일을 입력해 주세요.".to_string()),
        ));
        page.apply_report(report(
            ActionKind::CheckUserId,
            ActionOutcome::Alert("사용 가능한 아이디입니다.".to_string()),
        ));
        assert_eq!(page.queued_alerts(), 2);

        page.handle_key(key(KeyCode::Char('a')));
        assert_eq!(page.form().value(SignupField::Id), "");

        page.handle_key(key(KeyCode::Enter));
        assert_eq!(page.alert(), Some("사용 가능한 아이디입니다."));
        page.handle_key(key(KeyCode::Esc));
        assert_eq!(page.alert(), None);
    }

    #[test]
    fn test_ctrl_c_quits() {
        let mut page = SignupPage::new(SignupForm::default());
        assert_eq!(page.handle_key(ctrl('c')), PageCommand::Quit);
    }
}
