//! Checkout session: one owned value holding catalog access, the cart and
//! the wizard, passed by `&mut` to whoever needs it. There is no global
//! store behind it.

use std::collections::BTreeSet;

use crate::core::cart::CartState;
use crate::core::checkout::CheckoutWizard;
use crate::core::pricing::compute_price;
use crate::domain::model::{PriceCatalog, PriceQuote, SubmissionReceipt};
use crate::domain::ports::{CatalogSource, CheckoutGateway};
use crate::utils::error::Result;

pub struct CheckoutSession<C: CatalogSource> {
    config: C,
    cart: CartState,
    wizard: CheckoutWizard,
}

impl<C: CatalogSource> CheckoutSession<C> {
    /// Opens a session with an empty cart totalled under the configured
    /// rules and a wizard on its first step.
    pub fn new(config: C) -> Self {
        let cart = CartState::new(config.cart_rules().clone());
        Self {
            config,
            cart,
            wizard: CheckoutWizard::new(),
        }
    }

    pub fn catalog(&self) -> &PriceCatalog {
        self.config.catalog()
    }

    pub fn cart(&self) -> &CartState {
        &self.cart
    }

    pub fn cart_mut(&mut self) -> &mut CartState {
        &mut self.cart
    }

    pub fn wizard(&self) -> &CheckoutWizard {
        &self.wizard
    }

    pub fn wizard_mut(&mut self) -> &mut CheckoutWizard {
        &mut self.wizard
    }

    /// Records the service-details step and reprices right away, so the
    /// stored quote always reflects the latest inputs.
    pub fn set_service_details(
        &mut self,
        service_type: &str,
        property_size: &str,
        frequency: &str,
        add_ons: BTreeSet<String>,
    ) -> Result<PriceQuote> {
        self.wizard.update_form(|form| {
            form.service_type = service_type.to_string();
            form.property_size = property_size.to_string();
            form.frequency = frequency.to_string();
            form.add_ons = add_ons;
        });
        self.reprice()
    }

    /// Reprices the quote from the service details currently on the form.
    /// An unpriceable service drops the stored quote so a stale one can
    /// never reach submission.
    pub fn reprice(&mut self) -> Result<PriceQuote> {
        let request = self.wizard.form().service_request();
        match compute_price(&request, self.config.catalog()) {
            Ok(quote) => {
                self.wizard.set_quote(quote.clone());
                Ok(quote)
            }
            Err(err) => {
                self.wizard.clear_quote();
                Err(err)
            }
        }
    }

    pub async fn submit<G: CheckoutGateway>(&mut self, gateway: &G) -> Result<SubmissionReceipt> {
        self.wizard.submit(gateway).await
    }
}
