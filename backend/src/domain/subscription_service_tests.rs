//! Tests for the subscription plan service.

use std::sync::Arc;

use chrono::Duration;
use mockall::{Sequence, predicate::eq};
use rstest::rstest;

use super::*;
use crate::domain::ports::{MockPaymentGateway, MockSubscriptionRepository};
use crate::domain::{
    CreatedSubscription, Currency, Email, ErrorCode, Listing, Name, PaymentLink, ProviderType,
    Subscriber, Subscription,
};
use crate::test_support::{fixture_clock, fixture_timestamp, plan, plan_draft};

type Service = SubscriptionManagementService<MockSubscriptionRepository, MockPaymentGateway>;

fn make_service(repo: MockSubscriptionRepository, payments: MockPaymentGateway) -> Service {
    SubscriptionManagementService::new(Arc::new(repo), Arc::new(payments), fixture_clock())
}

fn id(value: i64) -> EntityId {
    EntityId::new(value).expect("valid id")
}

fn persisted_plan(plan_id: i64, is_active: bool) -> SubscriptionPlan {
    let mut plan = plan();
    plan.assign_id(id(plan_id));
    plan.set_active(is_active);
    plan
}

fn create_request() -> CreatePlanRequest {
    let draft = plan_draft();
    CreatePlanRequest {
        name: draft.name,
        description: draft.description,
        duration_in_days: draft.duration_in_days,
        amount_in_usd: draft.amount_in_usd,
        limit: draft.limit,
        subscription_type: draft.subscription_type,
        is_active: draft.is_active,
    }
}

fn subscriber(subscriptions: Vec<Subscription>) -> Subscriber {
    Subscriber::new(
        id(7),
        Name::new("Ada Obi").expect("valid name"),
        Email::new("ada@example.com").expect("valid email"),
        subscriptions,
    )
}

fn subscription(subscription_id: i64, has_paid: bool, offset: Duration) -> Subscription {
    let mut record = Subscription::pending(
        id(subscription_id),
        &NewSubscription {
            plan_id: id(3),
            user_id: id(7),
            expires_at: fixture_timestamp() + offset,
        },
    );
    record.has_paid = has_paid;
    record
}

fn listing_of(count: usize) -> Listing<Subscriber> {
    Listing::complete(vec![subscriber(Vec::new()); count])
}

#[tokio::test]
async fn create_plan_persists_and_returns_dto() {
    let mut repo = MockSubscriptionRepository::new();
    repo.expect_create_plan().times(1).returning(|plan| {
        let mut stored = plan.clone();
        stored.assign_id(EntityId::new(11).expect("valid id"));
        Ok(stored)
    });

    let service = make_service(repo, MockPaymentGateway::new());
    let dto = service
        .create_plan(create_request())
        .await
        .expect("plan created");

    assert_eq!(dto.id, 11);
    assert_eq!(dto.name, "Gold");
    assert_eq!(dto.duration_in_days, 30);
    assert_eq!(dto.price.currency, Currency::Usd);
    assert!(dto.is_active);
}

#[tokio::test]
async fn create_plan_reports_every_invalid_field_without_persisting() {
    let mut repo = MockSubscriptionRepository::new();
    repo.expect_create_plan().never();

    let service = make_service(repo, MockPaymentGateway::new());
    let mut request = create_request();
    request.name = "x".to_owned();
    request.duration_in_days = 1;
    request.limit.max_questions = 41;

    let error = service.create_plan(request).await.expect_err("invalid plan");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    let fields = error
        .details()
        .and_then(|details| details.get("fields"))
        .and_then(|fields| fields.as_array())
        .expect("field details");
    assert_eq!(fields.len(), 3);
    assert!(error.message().contains("limit.max_questions"));
}

#[tokio::test]
async fn get_plan_counts_each_bucket_with_a_separate_query() {
    let now = fixture_timestamp();
    let windows = LifecycleWindows::at(now);
    let mut repo = MockSubscriptionRepository::new();
    let mut seq = Sequence::new();

    repo.expect_find_plan_by_id()
        .with(eq(id(3)))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(Some(persisted_plan(3, true))));
    for (window, count) in [(windows.active, 4), (windows.expired, 2), (windows.due, 1)] {
        repo.expect_list_subscribers()
            .withf(move |filter| *filter == SubscriberFilter::paid_within(id(3), window))
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_| Ok(listing_of(count)));
    }

    let service = make_service(repo, MockPaymentGateway::new());
    let details = service.get_plan(3).await.expect("plan details");

    assert_eq!(details.plan.id, 3);
    assert_eq!(
        details.subscribers,
        SubscriberCount {
            active: 4,
            expired: 2,
            due: 1,
        }
    );
}

#[rstest]
#[case(0, ErrorCode::InvalidRequest)]
#[case(-4, ErrorCode::InvalidRequest)]
#[case(99, ErrorCode::NotFound)]
#[tokio::test]
async fn get_plan_rejects_bad_or_unknown_ids(#[case] raw: i64, #[case] expected: ErrorCode) {
    let mut repo = MockSubscriptionRepository::new();
    repo.expect_find_plan_by_id().returning(|_| Ok(None));
    repo.expect_list_subscribers().never();

    let service = make_service(repo, MockPaymentGateway::new());
    let error = service.get_plan(raw).await.expect_err("lookup fails");
    assert_eq!(error.code(), expected);
}

#[tokio::test]
async fn repository_connection_failures_are_service_unavailable() {
    let mut repo = MockSubscriptionRepository::new();
    repo.expect_list_plans()
        .times(1)
        .returning(|_| Err(SubscriptionPersistenceError::connection("refused")));

    let service = make_service(repo, MockPaymentGateway::new());
    let error = service
        .get_plans_list(PlanFilter::default())
        .await
        .expect_err("connection failure");
    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[tokio::test]
async fn get_plans_list_forwards_filter_and_total() {
    let mut repo = MockSubscriptionRepository::new();
    repo.expect_list_plans()
        .with(eq(PlanFilter {
            is_active: Some(true),
        }))
        .times(1)
        .returning(|_| {
            Ok(Listing::complete(vec![
                persisted_plan(1, true),
                persisted_plan(2, true),
            ]))
        });

    let service = make_service(repo, MockPaymentGateway::new());
    let list = service
        .get_plans_list(PlanFilter {
            is_active: Some(true),
        })
        .await
        .expect("plans listed");
    assert_eq!(list.total, 2);
    assert_eq!(
        list.result.iter().map(|plan| plan.id).collect::<Vec<_>>(),
        vec![1, 2]
    );
}

#[tokio::test]
async fn activating_an_active_plan_is_a_no_op() {
    let mut repo = MockSubscriptionRepository::new();
    repo.expect_find_plan_by_id()
        .times(1)
        .returning(|_| Ok(Some(persisted_plan(5, true))));
    repo.expect_update_plan().never();

    let service = make_service(repo, MockPaymentGateway::new());
    let dto = service
        .activate_or_deactivate_plan(5, true)
        .await
        .expect("plan unchanged");
    assert!(dto.is_active);
}

#[tokio::test]
async fn deactivating_persists_the_flag() {
    let mut repo = MockSubscriptionRepository::new();
    repo.expect_find_plan_by_id()
        .times(1)
        .returning(|_| Ok(Some(persisted_plan(5, true))));
    repo.expect_update_plan()
        .withf(|plan| !plan.is_active())
        .times(1)
        .returning(|plan| Ok(plan.clone()));

    let service = make_service(repo, MockPaymentGateway::new());
    let dto = service
        .activate_or_deactivate_plan(5, false)
        .await
        .expect("plan deactivated");
    assert!(!dto.is_active);
}

#[tokio::test]
async fn delete_plan_checks_existence_before_deleting() {
    let mut repo = MockSubscriptionRepository::new();
    let mut seq = Sequence::new();
    repo.expect_find_plan_by_id()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(Some(persisted_plan(8, false))));
    repo.expect_list_subscribers()
        .times(3)
        .in_sequence(&mut seq)
        .returning(|_| Ok(listing_of(0)));
    repo.expect_delete_plan()
        .with(eq(id(8)))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));

    let service = make_service(repo, MockPaymentGateway::new());
    service.delete_plan(8).await.expect("plan deleted");
}

#[tokio::test]
async fn delete_plan_surfaces_removal_between_check_and_delete() {
    let mut repo = MockSubscriptionRepository::new();
    repo.expect_find_plan_by_id()
        .returning(|_| Ok(Some(persisted_plan(8, false))));
    repo.expect_list_subscribers()
        .returning(|_| Ok(listing_of(0)));
    repo.expect_delete_plan()
        .times(1)
        .returning(|_| Err(SubscriptionPersistenceError::plan_not_found(8_i64)));

    let service = make_service(repo, MockPaymentGateway::new());
    let error = service.delete_plan(8).await.expect_err("raced delete");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn delete_plan_does_not_delete_unknown_plans() {
    let mut repo = MockSubscriptionRepository::new();
    repo.expect_find_plan_by_id().returning(|_| Ok(None));
    repo.expect_delete_plan().never();

    let service = make_service(repo, MockPaymentGateway::new());
    let error = service.delete_plan(8).await.expect_err("missing plan");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn subscribing_to_an_inactive_plan_is_a_conflict() {
    let mut repo = MockSubscriptionRepository::new();
    repo.expect_find_plan_by_id()
        .returning(|_| Ok(Some(persisted_plan(3, false))));
    repo.expect_create_subscription().never();

    let service = make_service(repo, MockPaymentGateway::new());
    let error = service
        .subscribe_user_to_plan(3, 7)
        .await
        .expect_err("inactive plan");
    assert_eq!(error.code(), ErrorCode::Conflict);
    assert_eq!(
        error.message(),
        "cannot create a subscription for an inactive plan"
    );
}

#[tokio::test]
async fn subscribing_validates_both_identifiers() {
    let mut repo = MockSubscriptionRepository::new();
    repo.expect_find_plan_by_id().never();

    let service = make_service(repo, MockPaymentGateway::new());
    let error = service
        .subscribe_user_to_plan(0, -1)
        .await
        .expect_err("invalid ids");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert!(error.message().contains("planId: id cannot be zero"));
    assert!(error.message().contains("userId: id cannot be negative"));
}

#[tokio::test]
async fn subscribing_creates_pending_subscription_and_initiates_payment() {
    let now = fixture_timestamp();
    let mut repo = MockSubscriptionRepository::new();
    repo.expect_find_plan_by_id()
        .returning(|_| Ok(Some(persisted_plan(3, true))));
    repo.expect_create_subscription()
        .withf(move |input| {
            input.plan_id == id(3)
                && input.user_id == id(7)
                && input.expires_at == now + Duration::days(30)
        })
        .times(1)
        .returning(|input| {
            let subscription = Subscription::pending(id(21), input);
            Ok(CreatedSubscription {
                subscriber: subscriber(vec![subscription.clone()]),
                subscription,
            })
        });

    let mut payments = MockPaymentGateway::new();
    payments.expect_provider().return_const(ProviderType::Paystack);
    payments
        .expect_settlement_currency()
        .return_const(Currency::Ngn);
    payments
        .expect_initiate_payment()
        .withf(|tx| {
            tx.entity() == TransactionEntity::subscription(id(21))
                && tx.amount().currency() == Currency::Ngn
                && tx.meta().get("planId") == Some("3")
                && !tx.is_paid()
        })
        .times(1)
        .returning(|mut tx| {
            tx.assign_id(id(40));
            let link = PaymentLink::parse("https://pay.example.com/tx/40").expect("valid link");
            tx.attach_provider_reference("ref-40", link, fixture_timestamp());
            Ok(tx)
        });

    let service = make_service(repo, payments);
    let response = service
        .subscribe_user_to_plan(3, 7)
        .await
        .expect("subscription created");

    assert_eq!(response.id, 7);
    assert_eq!(response.email, "ada@example.com");
    assert_eq!(response.plan.id, 3);
    assert_eq!(response.transaction.id, 40);
    assert_eq!(response.transaction.provider, ProviderType::Paystack);
    assert_eq!(response.transaction.amount.amount, 14_700.0);
    assert_eq!(
        response.transaction.payment_link.as_deref(),
        Some("https://pay.example.com/tx/40")
    );
}

#[tokio::test]
async fn payment_initiation_failures_are_surfaced() {
    let mut repo = MockSubscriptionRepository::new();
    repo.expect_find_plan_by_id()
        .returning(|_| Ok(Some(persisted_plan(3, true))));
    repo.expect_create_subscription().returning(|input| {
        let subscription = Subscription::pending(id(21), input);
        Ok(CreatedSubscription {
            subscriber: subscriber(vec![subscription.clone()]),
            subscription,
        })
    });
    let mut payments = MockPaymentGateway::new();
    payments.expect_provider().return_const(ProviderType::Paystack);
    payments
        .expect_settlement_currency()
        .return_const(Currency::Usd);
    payments
        .expect_initiate_payment()
        .times(1)
        .returning(|_| Err(PaymentGatewayError::unavailable("timeout")));

    let service = make_service(repo, payments);
    let error = service
        .subscribe_user_to_plan(3, 7)
        .await
        .expect_err("gateway down");
    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[tokio::test]
async fn completing_payment_records_it_on_the_subscription() {
    let paid_at = fixture_timestamp() + Duration::minutes(3);
    let mut payments = MockPaymentGateway::new();
    payments
        .expect_mark_transaction_as_paid()
        .with(eq(id(40)))
        .times(1)
        .returning(move |_| {
            let mut tx = Transaction::pending(
                ProviderType::Paystack,
                crate::domain::Price::new(10.0).expect("valid price"),
                TransactionEntity::subscription(id(21)),
                fixture_timestamp(),
            );
            tx.assign_id(id(40));
            tx.mark_paid(paid_at);
            Ok(tx)
        });

    let mut repo = MockSubscriptionRepository::new();
    repo.expect_record_subscription_payment()
        .withf(move |subscription_id, record| {
            *subscription_id == id(21)
                && record.paid_at == paid_at
                && record.transaction_id == "40"
                && record.provider == ProviderType::Paystack
        })
        .times(1)
        .returning(|subscription_id, record| {
            let mut subscription = subscription(subscription_id.value(), false, Duration::days(30));
            subscription.record_payment(record.clone());
            Ok(subscription)
        });

    let service = make_service(repo, payments);
    let dto = service
        .complete_subscription_payment(40)
        .await
        .expect("payment completed");
    assert!(dto.has_paid);
    assert_eq!(dto.paid_at, Some(paid_at));
    assert_eq!(dto.transaction_id.as_deref(), Some("40"));
}

#[tokio::test]
async fn completing_unknown_transaction_is_not_found() {
    let mut payments = MockPaymentGateway::new();
    payments
        .expect_mark_transaction_as_paid()
        .returning(|tx_id| Err(PaymentGatewayError::transaction_not_found(tx_id.value())));
    let mut repo = MockSubscriptionRepository::new();
    repo.expect_record_subscription_payment().never();

    let service = make_service(repo, payments);
    let error = service
        .complete_subscription_payment(40)
        .await
        .expect_err("unknown transaction");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn subscriber_list_selects_the_active_subscription() {
    let mut repo = MockSubscriptionRepository::new();
    repo.expect_list_subscribers()
        .withf(|filter| filter.plan_id == Some(id(3)) && filter.has_paid.is_none())
        .times(1)
        .returning(|_| {
            Ok(Listing::complete(vec![subscriber(vec![
                subscription(1, true, Duration::days(10)),
                subscription(2, true, Duration::days(2)),
                subscription(3, true, Duration::days(-1)),
            ])]))
        });

    let service = make_service(repo, MockPaymentGateway::new());
    let list = service
        .get_subscribers_list(SubscriberQuery {
            plan_id: Some(3),
            ..SubscriberQuery::default()
        })
        .await
        .expect("subscribers listed");

    assert_eq!(list.total, 1);
    let active = list.subscribers[0]
        .active_subscription
        .as_ref()
        .expect("active subscription");
    assert_eq!(active.id, 2);
    assert_eq!(list.subscribers[0].subscriptions.len(), 3);
}

#[tokio::test]
async fn subscriber_list_rejects_inverted_expiry_range() {
    let mut repo = MockSubscriptionRepository::new();
    repo.expect_list_subscribers().never();

    let now = fixture_timestamp();
    let service = make_service(repo, MockPaymentGateway::new());
    let error = service
        .get_subscribers_list(SubscriberQuery {
            expires_from: Some(now),
            expires_to: Some(now - Duration::days(1)),
            ..SubscriberQuery::default()
        })
        .await
        .expect_err("inverted range");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}
