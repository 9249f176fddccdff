//! Sandbox payment provider that issues checkout links and settles on demand.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;
use uuid::Uuid;

use crate::domain::ports::{PaymentGateway, PaymentGatewayError};
use crate::domain::{Currency, EntityId, PaymentLink, ProviderType, Transaction};

/// Provider identity and checkout location for [`SandboxPaymentGateway`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxGatewaySettings {
    pub provider: ProviderType,
    pub currency: Currency,
    /// Base URL; the provider reference is appended as the final path segment.
    pub checkout_base_url: String,
}

impl Default for SandboxGatewaySettings {
    fn default() -> Self {
        Self {
            provider: ProviderType::Paystack,
            currency: Currency::Ngn,
            checkout_base_url: "https://checkout.paystack.com".to_owned(),
        }
    }
}

#[derive(Debug, Default)]
struct Ledger {
    last_id: i64,
    transactions: BTreeMap<EntityId, Transaction>,
}

/// [`PaymentGateway`] keeping transactions in memory.
///
/// Payments are never charged; `mark_transaction_as_paid` settles whatever
/// transaction it is given, as a provider webhook would.
pub struct SandboxPaymentGateway {
    settings: SandboxGatewaySettings,
    ledger: Mutex<Ledger>,
    clock: Arc<dyn Clock>,
}

impl SandboxPaymentGateway {
    pub fn new(settings: SandboxGatewaySettings, clock: Arc<dyn Clock>) -> Self {
        Self {
            settings,
            ledger: Mutex::new(Ledger::default()),
            clock,
        }
    }

    fn checkout_link(&self, reference: &str) -> Result<PaymentLink, PaymentGatewayError> {
        let base = self.settings.checkout_base_url.trim_end_matches('/');
        PaymentLink::parse(&format!("{base}/{reference}"))
            .map_err(|err| PaymentGatewayError::rejected(err.to_string()))
    }
}

#[async_trait]
impl PaymentGateway for SandboxPaymentGateway {
    fn provider(&self) -> ProviderType {
        self.settings.provider
    }

    fn settlement_currency(&self) -> Currency {
        self.settings.currency
    }

    async fn initiate_payment(
        &self,
        mut transaction: Transaction,
    ) -> Result<Transaction, PaymentGatewayError> {
        let reference = Uuid::new_v4().simple().to_string();
        let link = self.checkout_link(&reference)?;
        let now = self.clock.utc();
        let mut ledger = self
            .ledger
            .lock()
            .map_err(|_| PaymentGatewayError::unavailable("payment ledger lock poisoned"))?;
        ledger.last_id += 1;
        let id = EntityId::new(ledger.last_id)
            .map_err(|err| PaymentGatewayError::unavailable(err.to_string()))?;
        transaction.assign_id(id);
        transaction.attach_provider_reference(reference, link, now);
        ledger.transactions.insert(id, transaction.clone());
        info!(transaction_id = id.value(), "payment initiated");
        Ok(transaction)
    }

    async fn mark_transaction_as_paid(
        &self,
        transaction_id: EntityId,
    ) -> Result<Transaction, PaymentGatewayError> {
        let now = self.clock.utc();
        let mut ledger = self
            .ledger
            .lock()
            .map_err(|_| PaymentGatewayError::unavailable("payment ledger lock poisoned"))?;
        let transaction = ledger
            .transactions
            .get_mut(&transaction_id)
            .ok_or_else(|| PaymentGatewayError::transaction_not_found(transaction_id.value()))?;
        transaction.mark_paid(now);
        Ok(transaction.clone())
    }
}
