//! Driven port for the payment provider.
use async_trait::async_trait;

use crate::domain::{Currency, EntityId, ProviderType, Transaction};

use super::define_port_error;

define_port_error! {
    /// Errors surfaced by payment provider adapters.
    pub enum PaymentGatewayError {
        /// Provider could not be reached.
        Unavailable { message: String } => "payment provider is unavailable: {message}",
        /// Provider refused the request.
        Rejected { message: String } => "payment was rejected: {message}",
        TransactionNotFound { id: i64 } => "transaction {id} not found",
    }
}

/// Payment provider integration.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Provider this gateway settles through.
    fn provider(&self) -> ProviderType;

    /// Currency charged by the provider.
    fn settlement_currency(&self) -> Currency;

    /// Persist `transaction` and obtain a checkout link for it.
    async fn initiate_payment(
        &self,
        transaction: Transaction,
    ) -> Result<Transaction, PaymentGatewayError>;

    /// Settle a previously initiated transaction.
    async fn mark_transaction_as_paid(
        &self,
        transaction_id: EntityId,
    ) -> Result<Transaction, PaymentGatewayError>;
}
