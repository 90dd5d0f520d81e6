//! Checkout wizard: a shallow four-step state machine over one flat form.
//! Navigation is never gated here; submission is.

use crate::domain::model::{
    BookingSubmission, CheckoutForm, CheckoutStep, ContactInfo, PriceQuote, ScheduleInfo,
    SubmissionReceipt,
};
use crate::domain::ports::CheckoutGateway;
use crate::utils::error::{CheckoutError, Result};

/// Current step, the form being filled, and the quote priced for it.
///
/// Once a submission succeeds the wizard is terminal: navigation, form
/// edits and further submits all become no-ops (the last one an error).
#[derive(Debug, Clone)]
pub struct CheckoutWizard {
    step: CheckoutStep,
    form: CheckoutForm,
    quote: Option<PriceQuote>,
    submitted: bool,
}

impl Default for CheckoutWizard {
    fn default() -> Self {
        Self {
            step: CheckoutStep::FIRST,
            form: CheckoutForm::default(),
            quote: None,
            submitted: false,
        }
    }
}

impl CheckoutWizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> CheckoutStep {
        self.step
    }

    pub fn form(&self) -> &CheckoutForm {
        &self.form
    }

    pub fn quote(&self) -> Option<&PriceQuote> {
        self.quote.as_ref()
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Edits the form in place. Ignored once submitted.
    pub fn update_form(&mut self, update: impl FnOnce(&mut CheckoutForm)) {
        if self.submitted {
            tracing::debug!("form edit after submission ignored");
            return;
        }
        update(&mut self.form);
    }

    /// Stores the quote priced for the current service details.
    pub fn set_quote(&mut self, quote: PriceQuote) {
        if self.submitted {
            return;
        }
        self.quote = Some(quote);
    }

    /// Drops a quote that no longer matches the form, e.g. after the
    /// service type changed to something unpriceable.
    pub fn clear_quote(&mut self) {
        if self.submitted {
            return;
        }
        self.quote = None;
    }

    /// Advances one step. Clamped at the last step and after submission.
    pub fn next(&mut self) {
        if self.submitted {
            return;
        }
        if let Some(step) = self.step.next() {
            self.step = step;
        }
    }

    /// Steps back once. Clamped at the first step and after submission.
    pub fn previous(&mut self) {
        if self.submitted {
            return;
        }
        if let Some(step) = self.step.previous() {
            self.step = step;
        }
    }

    /// Names the required fields still blank on `step`. Navigation is not
    /// gated on this; front ends that want gated steps call it themselves.
    pub fn missing_fields(&self, step: CheckoutStep) -> Vec<&'static str> {
        fn blank(value: &str) -> bool {
            value.trim().is_empty()
        }

        let form = &self.form;
        let mut missing = Vec::new();
        match step {
            CheckoutStep::PersonalInfo => {
                if blank(&form.full_name) {
                    missing.push("full_name");
                }
                if blank(&form.email) {
                    missing.push("email");
                }
                if blank(&form.phone) {
                    missing.push("phone");
                }
            }
            CheckoutStep::ServiceDetails => {
                if blank(&form.service_type) {
                    missing.push("service_type");
                }
                if blank(&form.property_size) {
                    missing.push("property_size");
                }
                if blank(&form.frequency) {
                    missing.push("frequency");
                }
            }
            CheckoutStep::Schedule => {
                if blank(&form.preferred_date) {
                    missing.push("preferred_date");
                }
            }
            CheckoutStep::Payment => {
                if blank(&form.payment_method) {
                    missing.push("payment_method");
                }
                if !form.terms_accepted {
                    missing.push("terms_accepted");
                }
            }
        }
        missing
    }

    pub fn is_step_complete(&self, step: CheckoutStep) -> bool {
        self.missing_fields(step).is_empty()
    }

    /// Hands the booking to the gateway. Only allowed on the payment step
    /// with terms accepted and a priced quote in hand.
    ///
    /// A gateway failure leaves the wizard exactly as it was, so the caller
    /// can retry; a success is terminal.
    pub async fn submit<G: CheckoutGateway>(&mut self, gateway: &G) -> Result<SubmissionReceipt> {
        if self.submitted {
            return Err(CheckoutError::SubmitNotReady {
                reason: "booking already submitted".to_string(),
            });
        }
        if self.step != CheckoutStep::Payment {
            return Err(CheckoutError::SubmitNotReady {
                reason: format!("not on the payment step (currently {})", self.step),
            });
        }
        if !self.form.terms_accepted {
            return Err(CheckoutError::SubmitNotReady {
                reason: "terms and conditions not accepted".to_string(),
            });
        }
        let Some(quote) = self.quote.clone() else {
            return Err(CheckoutError::SubmitNotReady {
                reason: "no quote priced for the selected service".to_string(),
            });
        };

        let submission = BookingSubmission {
            contact: ContactInfo {
                full_name: self.form.full_name.clone(),
                email: self.form.email.clone(),
                phone: self.form.phone.clone(),
            },
            service: self.form.service_request(),
            schedule: ScheduleInfo {
                preferred_date: self.form.preferred_date.clone(),
                preferred_time: self.form.preferred_time.clone(),
                notes: self.form.notes.clone(),
            },
            payment_method: self.form.payment_method.clone(),
            quote,
        };

        let receipt = gateway.submit(&submission).await?;
        self.submitted = true;
        tracing::info!("booking {} confirmed", receipt.booking_id);
        Ok(receipt)
    }
}
