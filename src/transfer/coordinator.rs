//! Transfer Session
//!
//! Owns everything one user touches while filling in the form: balances,
//! the pending request, the OTP challenge and the current screen. Each action
//! runs to completion and either moves the FSM or leaves it untouched.

use crate::transfer::adapters::{
    AlwaysSettle, LogDelivery, OtpDelivery, SettlementBackend, SettlementResult,
};
use crate::transfer::error::TransferError;
use crate::formatter::mask_account;
use crate::transfer::otp::{self, OtpSource, OtpState, RandomOtpSource};
use crate::transfer::state::{transition, FormEvent, FormPhase};
use crate::transfer::store::SettingsStore;
use crate::transfer::types::{
    SessionState, Settings, TransferOutcome, TransferReceipt, TransferRequest,
};
use crate::transfer::validator::{parse_amount, validate_details, validate_form};
use crate::{log_otp_issued, log_transfer_cancelled, log_transfer_settled};

/// Draws from the source before giving up on getting a different code
const RESEND_MAX_DRAWS: usize = 8;

pub struct TransferSession {
    settings: Settings,
    state: SessionState,
    phase: FormPhase,
    pending: Option<TransferRequest>,
    outcome: Option<TransferOutcome>,
    otp_source: Box<dyn OtpSource>,
    delivery: Box<dyn OtpDelivery>,
    settlement: Box<dyn SettlementBackend>,
    store: Option<SettingsStore>,
}

impl TransferSession {
    pub fn new(settings: Settings) -> Result<Self, TransferError> {
        settings.validate()?;
        Ok(Self {
            settings,
            state: SessionState::from_settings(&settings),
            phase: FormPhase::Form,
            pending: None,
            outcome: None,
            otp_source: Box::new(RandomOtpSource),
            delivery: Box::new(LogDelivery),
            settlement: Box::new(AlwaysSettle),
            store: None,
        })
    }

    /// Seed settings from `store` and persist through it afterwards
    pub fn with_store(defaults: Settings, store: SettingsStore) -> Result<Self, TransferError> {
        let settings = store.load_settings(&defaults)?;
        let mut session = Self::new(settings)?;
        session.store = Some(store);
        Ok(session)
    }

    pub fn with_otp_source(mut self, source: impl OtpSource + 'static) -> Self {
        self.otp_source = Box::new(source);
        self
    }

    pub fn with_delivery(mut self, delivery: impl OtpDelivery + 'static) -> Self {
        self.delivery = Box::new(delivery);
        self
    }

    pub fn with_settlement(mut self, backend: impl SettlementBackend + 'static) -> Self {
        log::info!("Settlement backend: {}", backend.name());
        self.settlement = Box::new(backend);
        self
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn pending(&self) -> Option<&TransferRequest> {
        self.pending.as_ref()
    }

    /// Store the settings are persisted to, if any
    pub fn store(&self) -> Option<&SettingsStore> {
        self.store.as_ref()
    }

    /// Outcome shown on the result screen
    pub fn outcome(&self) -> Option<&TransferOutcome> {
        self.outcome.as_ref()
    }

    /// Submit from raw form text
    pub fn submit_form(
        &mut self,
        target_account: &str,
        amount: &str,
        notes: Option<&str>,
    ) -> Result<(), TransferError> {
        // Check the screen first so a bad amount on the wrong screen reports the screen
        transition(self.phase, FormEvent::Submit)?;
        let amount = parse_amount(amount)?;
        self.submit(TransferRequest::new(target_account, amount, notes))
    }

    /// Form -> AwaitingOtp: check the amount, issue and deliver a code
    pub fn submit(&mut self, request: TransferRequest) -> Result<(), TransferError> {
        let next = transition(self.phase, FormEvent::Submit)?;

        if !validate_form(request.amount) {
            return Err(TransferError::InvalidAmountRange);
        }
        if self.settings.upfront_checks {
            validate_details(&request.target_account, request.amount, &self.state)?;
        }

        let code = self.otp_source.next_code();
        self.issue_otp(&request, code);
        log_otp_issued!(
            mask_account(&request.target_account),
            request.amount,
            self.state.otp_attempts_remaining()
        );
        self.pending = Some(request);
        self.outcome = None;
        self.phase = next;
        Ok(())
    }

    /// Check the entered code and, on a match, settle the pending transfer.
    ///
    /// Errors carry the message for the user; the phase after the call tells
    /// whether they are still on the OTP screen or back on the form.
    pub fn verify_otp(&mut self, entered: &str) -> Result<&TransferOutcome, TransferError> {
        if self.phase != FormPhase::AwaitingOtp {
            return Err(TransferError::InvalidStateTransition {
                from: self.phase.as_str().to_string(),
                event: "verify_otp".to_string(),
            });
        }

        match self.state.otp.check(entered) {
            Ok(()) => {}
            Err(TransferError::OtpMismatch { attempts_remaining }) => {
                self.phase = transition(self.phase, FormEvent::OtpRejected)?;
                log::info!("OTP mismatch, {} attempts left", attempts_remaining);
                return Err(TransferError::OtpMismatch { attempts_remaining });
            }
            Err(TransferError::OtpAttemptsExhausted) => {
                self.phase = transition(self.phase, FormEvent::OtpLocked)?;
                self.pending = None;
                log_transfer_cancelled!("otp_attempts_exhausted");
                return Err(TransferError::OtpAttemptsExhausted);
            }
            Err(e) => return Err(e),
        }

        let Some(request) = self.pending.take() else {
            // Issued OTP always comes with a pending request
            self.phase = transition(self.phase, FormEvent::DetailsRejected)?;
            return Err(TransferError::InvalidStateTransition {
                from: FormPhase::AwaitingOtp.as_str().to_string(),
                event: "verify_otp".to_string(),
            });
        };

        if let Err(e) = validate_details(&request.target_account, request.amount, &self.state) {
            self.phase = transition(self.phase, FormEvent::DetailsRejected)?;
            log_transfer_cancelled!(e.error_code());
            return Err(e);
        }

        let outcome = match self.settlement.settle(&request) {
            SettlementResult::Settled => {
                self.phase = transition(self.phase, FormEvent::Settled)?;
                TransferOutcome::Success(self.apply(request))
            }
            SettlementResult::Declined(message) => {
                self.phase = transition(self.phase, FormEvent::SettlementFailed)?;
                log::warn!("Settlement declined by {}: {}", self.settlement.name(), message);
                TransferOutcome::Failure { message }
            }
        };

        Ok(self.outcome.insert(outcome))
    }

    /// Issue a code different from the outstanding one with full attempts,
    /// staying on the OTP screen
    pub fn resend_otp(&mut self) -> Result<(), TransferError> {
        let next = transition(self.phase, FormEvent::Resend)?;
        let Some(request) = self.pending.clone() else {
            return Err(TransferError::InvalidStateTransition {
                from: self.phase.as_str().to_string(),
                event: FormEvent::Resend.as_str().to_string(),
            });
        };
        let previous = self.state.generated_otp().map(str::to_string);
        let code = self.fresh_code(previous.as_deref());
        self.issue_otp(&request, code);
        log::info!("OTP re-issued for account {}", mask_account(&request.target_account));
        self.phase = next;
        Ok(())
    }

    /// Leave the OTP screen without penalty
    pub fn back(&mut self) -> Result<(), TransferError> {
        self.phase = transition(self.phase, FormEvent::Back)?;
        self.pending = None;
        self.state.otp = OtpState::Idle;
        log_transfer_cancelled!("back");
        Ok(())
    }

    /// Result -> Form
    pub fn new_transaction(&mut self) -> Result<(), TransferError> {
        self.phase = transition(self.phase, FormEvent::NewTransaction)?;
        self.clear();
        Ok(())
    }

    /// Back to an empty form from anywhere. Calling it again changes nothing.
    pub fn reset_form(&mut self) {
        self.phase = FormPhase::Form;
        self.clear();
    }

    /// Change the daily limit; consumption starts over
    pub fn set_daily_limit(&mut self, daily_limit: u64) -> Result<(), TransferError> {
        let settings = Settings {
            daily_limit,
            ..self.settings
        };
        settings.validate()?;
        if let Some(store) = self.store.as_mut() {
            store.save_daily_limit(daily_limit)?;
        }
        self.settings = settings;
        self.state.daily_limit = daily_limit;
        self.state.used_limit = 0;
        log::info!("Daily limit set to {}, used limit reset", daily_limit);
        Ok(())
    }

    pub fn set_balance(&mut self, balance: u64) -> Result<(), TransferError> {
        if let Some(store) = self.store.as_mut() {
            store.save_balance(balance)?;
        }
        self.settings.balance = balance;
        self.state.current_balance = balance;
        log::info!("Balance set to {}", balance);
        Ok(())
    }

    /// Persist the current balance and limit. No-op without a store.
    pub fn save_settings(&mut self) -> Result<(), TransferError> {
        let (balance, limit) = (self.state.current_balance, self.state.daily_limit);
        if let Some(store) = self.store.as_mut() {
            store.save_settings(balance, limit)?;
            log::info!("Settings saved (balance={}, daily_limit={})", balance, limit);
        }
        Ok(())
    }

    fn issue_otp(&mut self, request: &TransferRequest, code: String) {
        self.delivery.deliver(request, &code);
        self.state.otp = OtpState::issue(code);
    }

    /// Next code from the source that differs from `previous`
    fn fresh_code(&mut self, previous: Option<&str>) -> String {
        for _ in 0..RESEND_MAX_DRAWS {
            let code = self.otp_source.next_code();
            if previous != Some(code.as_str()) {
                return code;
            }
        }

        // Source keeps repeating itself: step to the neighbouring code
        log::warn!("OTP source repeated the previous code {} times", RESEND_MAX_DRAWS);
        match previous.and_then(|p| p.parse::<u32>().ok()) {
            Some(n) if (100_000..999_999).contains(&n) => (n + 1).to_string(),
            Some(999_999) => "100000".to_string(),
            _ => loop {
                let code = otp::generate();
                if previous != Some(code.as_str()) {
                    break code;
                }
            },
        }
    }

    /// Debit the balance and consume limit; details were checked just before
    fn apply(&mut self, request: TransferRequest) -> TransferReceipt {
        let balance_before = self.state.current_balance;
        self.state.current_balance -= request.amount;
        self.state.used_limit += request.amount;
        self.settings.balance = self.state.current_balance;

        log_transfer_settled!(
            mask_account(&request.target_account),
            request.amount,
            balance_before,
            self.state.current_balance
        );

        TransferReceipt {
            target_account: request.target_account,
            amount: request.amount,
            notes: request.notes,
            balance_after: self.state.current_balance,
            used_limit_after: self.state.used_limit,
            settled_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    fn clear(&mut self) {
        self.pending = None;
        self.outcome = None;
        self.state.otp = OtpState::Idle;
    }
}
