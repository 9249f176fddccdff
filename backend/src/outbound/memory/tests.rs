//! Behavioural coverage for the in-memory repositories.

use super::*;
use crate::domain::ports::{
    InstitutionPersistenceError, InstitutionRepository, SubscriptionPersistenceError,
    SubscriptionRepository, UserPersistenceError, UserRepository,
};
use crate::domain::{
    Description, Email, ExpiryWindow, LifecycleWindows, Name, NewSubscription, PaymentRecord, PlanFilter,
    ProviderType, SubscriberFilter, TokenType, TokenValue, UserFilter, UserStatus,
};
use crate::test_support::{fixture_clock, fixture_timestamp, long_description, plan};
use chrono::Duration;
use rstest::{fixture, rstest};

#[fixture]
fn store() -> InMemoryStore {
    InMemoryStore::new(fixture_clock())
}

fn user(email: &str) -> User {
    User::new(
        Name::new("Ada Obi").expect("name"),
        Email::new(email).expect("email"),
        fixture_timestamp(),
    )
}

async fn seeded_user(store: &InMemoryStore, email: &str) -> EntityId {
    store
        .create_user(&user(email))
        .await
        .expect("create user")
        .id()
        .expect("assigned id")
}

async fn seeded_plan(store: &InMemoryStore) -> EntityId {
    store
        .create_plan(&plan())
        .await
        .expect("create plan")
        .id()
        .expect("assigned id")
}

#[rstest]
#[tokio::test]
async fn users_get_sequential_ids_and_unique_emails(store: InMemoryStore) {
    let first = seeded_user(&store, "ada@example.com").await;
    let second = seeded_user(&store, "bola@example.com").await;
    assert_eq!(first.value(), 1);
    assert_eq!(second.value(), 2);

    let err = store
        .create_user(&user("ADA@example.com"))
        .await
        .expect_err("duplicate email");
    assert_eq!(
        err,
        UserPersistenceError::duplicate_email("ADA@example.com")
    );
}

#[rstest]
#[tokio::test]
async fn email_lookup_ignores_case(store: InMemoryStore) {
    let id = seeded_user(&store, "Ada@Example.com").await;
    let found = store
        .find_user_by_email(&Email::new("ada@example.com").expect("email"))
        .await
        .expect("lookup")
        .expect("present");
    assert_eq!(found.id(), Some(id));
}

#[rstest]
#[tokio::test]
async fn update_user_rejects_unknown_ids(store: InMemoryStore) {
    let mut ghost = user("ghost@example.com");
    ghost.assign_id(EntityId::new(40).expect("id"));
    let err = store.update_user(&ghost).await.expect_err("unknown user");
    assert_eq!(err, UserPersistenceError::user_not_found(40));
}

#[rstest]
#[tokio::test]
async fn list_users_filters_by_status(store: InMemoryStore) {
    let id = seeded_user(&store, "ada@example.com").await;
    seeded_user(&store, "bola@example.com").await;
    let mut inactive = store
        .find_user_by_id(id)
        .await
        .expect("lookup")
        .expect("present");
    inactive.set_status(UserStatus::Inactive, fixture_timestamp());
    store.update_user(&inactive).await.expect("update");

    let listing = store
        .list_users(UserFilter {
            status: Some(UserStatus::Inactive),
        })
        .await
        .expect("list");
    assert_eq!(listing.total, 1);
    assert_eq!(listing.items[0].id(), Some(id));
}

#[rstest]
#[tokio::test]
async fn tokens_are_scoped_by_user_and_type(store: InMemoryStore) {
    let user_id = seeded_user(&store, "ada@example.com").await;
    let value = TokenValue::new("abcdefghijklmnop").expect("token value");
    for token_type in [TokenType::Verification, TokenType::ResetPassword] {
        store
            .create_token(&Token::new(
                value.clone(),
                token_type,
                user_id,
                fixture_timestamp(),
            ))
            .await
            .expect("create token");
    }

    let found = store
        .find_token(user_id, &value, TokenType::ResetPassword)
        .await
        .expect("lookup")
        .expect("present");
    assert_eq!(found.token_type(), TokenType::ResetPassword);

    let removed = store
        .delete_tokens_for_user(user_id, TokenType::Verification)
        .await
        .expect("delete");
    assert_eq!(removed, 1);
    assert!(
        store
            .find_token(user_id, &value, TokenType::Verification)
            .await
            .expect("lookup")
            .is_none()
    );

    let token_id = found.id().expect("id");
    store.delete_token(token_id).await.expect("delete");
    store.delete_token(token_id).await.expect("second delete is a no-op");
}

#[rstest]
#[tokio::test]
async fn plans_filter_and_delete(store: InMemoryStore) {
    let active = seeded_plan(&store).await;
    let mut inactive = plan();
    inactive.set_active(false);
    store.create_plan(&inactive).await.expect("create plan");

    let listing = store
        .list_plans(PlanFilter {
            is_active: Some(true),
        })
        .await
        .expect("list");
    assert_eq!(listing.total, 1);
    assert_eq!(listing.items[0].id(), Some(active));

    store.delete_plan(active).await.expect("delete");
    assert_eq!(
        store.delete_plan(active).await,
        Err(SubscriptionPersistenceError::plan_not_found(active.value()))
    );
}

#[rstest]
#[tokio::test]
async fn create_subscription_requires_plan_and_user(store: InMemoryStore) {
    let plan_id = seeded_plan(&store).await;
    let missing = EntityId::new(99).expect("id");
    let err = store
        .create_subscription(&NewSubscription {
            plan_id,
            user_id: missing,
            expires_at: fixture_timestamp(),
        })
        .await
        .expect_err("unknown user");
    assert_eq!(err, SubscriptionPersistenceError::user_not_found(99));
}

#[rstest]
#[tokio::test]
async fn subscribers_match_on_any_subscription_and_carry_history(store: InMemoryStore) {
    let plan_id = seeded_plan(&store).await;
    let ada = seeded_user(&store, "ada@example.com").await;
    let bola = seeded_user(&store, "bola@example.com").await;
    let now = fixture_timestamp();

    let paid = store
        .create_subscription(&NewSubscription {
            plan_id,
            user_id: ada,
            expires_at: now + Duration::days(10),
        })
        .await
        .expect("subscribe");
    store
        .create_subscription(&NewSubscription {
            plan_id,
            user_id: ada,
            expires_at: now + Duration::days(40),
        })
        .await
        .expect("subscribe");
    store
        .create_subscription(&NewSubscription {
            plan_id,
            user_id: bola,
            expires_at: now + Duration::days(10),
        })
        .await
        .expect("subscribe");
    store
        .record_subscription_payment(
            paid.subscription.id,
            &PaymentRecord {
                paid_at: now,
                transaction_id: "1".to_owned(),
                provider: ProviderType::Paystack,
            },
        )
        .await
        .expect("record payment");

    let listing = store
        .list_subscribers(&SubscriberFilter::paid_within(
            plan_id,
            ExpiryWindow {
                from: Some(now),
                to: Some(now + Duration::days(30)),
            },
        ))
        .await
        .expect("list");

    assert_eq!(listing.total, 1);
    let subscriber = &listing.items[0];
    assert_eq!(subscriber.id, ada);
    assert_eq!(subscriber.subscriptions().len(), 2);
    assert_eq!(
        subscriber
            .active_subscription(now)
            .map(|subscription| subscription.id),
        Some(paid.subscription.id)
    );
}

#[rstest]
#[tokio::test]
async fn active_window_skips_subscription_expiring_at_the_grace_boundary(store: InMemoryStore) {
    let plan_id = seeded_plan(&store).await;
    let now = fixture_timestamp();
    for (email, expires_at) in [
        ("ada@example.com", now + Duration::hours(24)),
        ("bola@example.com", now + Duration::hours(24) + Duration::seconds(1)),
    ] {
        let user_id = seeded_user(&store, email).await;
        let created = store
            .create_subscription(&NewSubscription {
                plan_id,
                user_id,
                expires_at,
            })
            .await
            .expect("subscribe");
        store
            .record_subscription_payment(
                created.subscription.id,
                &PaymentRecord {
                    paid_at: now,
                    transaction_id: email.to_owned(),
                    provider: ProviderType::Paystack,
                },
            )
            .await
            .expect("record payment");
    }

    let active = store
        .list_subscribers(&SubscriberFilter::paid_within(
            plan_id,
            LifecycleWindows::at(now).active,
        ))
        .await
        .expect("list");

    assert_eq!(active.total, 1);
    assert_eq!(active.items[0].email.as_ref(), "bola@example.com");
}

#[rstest]
#[tokio::test]
async fn record_payment_requires_known_subscription(store: InMemoryStore) {
    let err = store
        .record_subscription_payment(
            EntityId::new(5).expect("id"),
            &PaymentRecord {
                paid_at: fixture_timestamp(),
                transaction_id: "1".to_owned(),
                provider: ProviderType::Paystack,
            },
        )
        .await
        .expect_err("unknown subscription");
    assert_eq!(err, SubscriptionPersistenceError::subscription_not_found(5));
}

fn institution() -> Institution {
    Institution::new(
        Name::new("Kings College").expect("name"),
        Description::new(long_description()).expect("description"),
        Email::new("admin@kings.edu.ng").expect("email"),
        fixture_timestamp(),
    )
}

fn staff(email: &str) -> Staff {
    Staff::new(
        Name::new("Tunde Bello").expect("name"),
        Email::new(email).expect("email"),
        fixture_timestamp(),
    )
}

fn group() -> Group {
    Group::new(
        Name::new("Science").expect("name"),
        Description::new(long_description()).expect("description"),
        fixture_timestamp(),
    )
}

#[rstest]
#[tokio::test]
async fn staff_and_groups_are_scoped_to_their_institution(store: InMemoryStore) {
    let first = store
        .create_institution(&institution())
        .await
        .expect("create")
        .id()
        .expect("id");
    let second = store
        .create_institution(&institution())
        .await
        .expect("create")
        .id()
        .expect("id");
    let member = store
        .add_staff(first, &staff("tunde@kings.edu.ng"))
        .await
        .expect("add staff")
        .id()
        .expect("id");
    let group_id = store
        .create_group(first, &group())
        .await
        .expect("create group")
        .id()
        .expect("id");

    assert_eq!(store.list_staff(first).await.expect("list").total, 1);
    assert_eq!(store.list_staff(second).await.expect("list").total, 0);
    assert!(
        store
            .find_staff(second, member)
            .await
            .expect("lookup")
            .is_none()
    );
    assert!(
        store
            .find_group(second, group_id)
            .await
            .expect("lookup")
            .is_none()
    );

    let updated = store
        .add_staff_to_group(first, group_id, member)
        .await
        .expect("add to group");
    assert_eq!(updated.staff_ids(), &[member]);
    assert_eq!(
        store.list_groups(first).await.expect("list").items[0].staff_ids(),
        &[member]
    );
}

#[rstest]
#[tokio::test]
async fn institution_children_require_parent(store: InMemoryStore) {
    let missing = EntityId::new(3).expect("id");
    assert_eq!(
        store.add_staff(missing, &staff("a@b.co")).await,
        Err(InstitutionPersistenceError::institution_not_found(3))
    );
    assert_eq!(
        store.create_group(missing, &group()).await,
        Err(InstitutionPersistenceError::institution_not_found(3))
    );
}

#[rstest]
#[tokio::test]
async fn add_staff_to_group_rejects_foreign_staff(store: InMemoryStore) {
    let first = store
        .create_institution(&institution())
        .await
        .expect("create")
        .id()
        .expect("id");
    let second = store
        .create_institution(&institution())
        .await
        .expect("create")
        .id()
        .expect("id");
    let outsider = store
        .add_staff(second, &staff("out@other.ng"))
        .await
        .expect("add staff")
        .id()
        .expect("id");
    let group_id = store
        .create_group(first, &group())
        .await
        .expect("create group")
        .id()
        .expect("id");

    assert_eq!(
        store.add_staff_to_group(first, group_id, outsider).await,
        Err(InstitutionPersistenceError::staff_not_found(outsider.value()))
    );
}
