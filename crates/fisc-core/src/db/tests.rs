//! Database tests

use super::*;
use crate::models::*;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn month(s: &str) -> crate::month::MonthKey {
        s.parse().unwrap()
    }

    fn seed_user(db: &Database) -> User {
        db.create_user("alice@example.com", "Alice", "$argon2-fake-hash")
            .unwrap()
    }

    fn new_tx(kind: TransactionType, amount: f64, category: &str, d: NaiveDate) -> NewTransaction {
        NewTransaction {
            kind,
            amount,
            category: category.to_string(),
            wallet: "checking".to_string(),
            date: d,
            note: None,
        }
    }

    #[test]
    fn test_empty_db() {
        let db = Database::in_memory().unwrap();
        assert_eq!(db.count_users().unwrap(), 0);
        assert_eq!(db.count_transactions().unwrap(), 0);
        assert_eq!(db.count_budgets().unwrap(), 0);
    }

    #[test]
    fn test_user_crud() {
        let db = Database::in_memory().unwrap();

        let user = seed_user(&db);
        assert!(user.id > 0);
        assert_eq!(user.email, "alice@example.com");

        let fetched = db.get_user(user.id).unwrap().unwrap();
        assert_eq!(fetched.name, "Alice");

        let (by_email, hash) = db.get_user_by_email("alice@example.com").unwrap().unwrap();
        assert_eq!(by_email.id, user.id);
        assert_eq!(hash, "$argon2-fake-hash");

        assert!(db.get_user(9999).unwrap().is_none());
    }

    #[test]
    fn test_duplicate_email_rejected() {
        let db = Database::in_memory().unwrap();
        seed_user(&db);

        // Same email, different case
        let result = db.create_user("Alice@Example.com", "Other", "hash");
        assert!(matches!(result, Err(crate::Error::InvalidData(_))));
        assert_eq!(db.count_users().unwrap(), 1);
    }

    #[test]
    fn test_transaction_crud() {
        let db = Database::in_memory().unwrap();
        let user = seed_user(&db);

        let tx = db
            .insert_transaction(
                user.id,
                &new_tx(TransactionType::Expense, 42.5, "food", date(2025, 3, 10)),
            )
            .unwrap();
        assert!(tx.id > 0);
        assert_eq!(tx.user_id, user.id);
        assert_eq!(tx.kind, TransactionType::Expense);
        assert_eq!(tx.amount, 42.5);

        let updated = db
            .update_transaction(
                tx.id,
                &TransactionUpdate {
                    amount: Some(50.0),
                    note: Some(Some("groceries".to_string())),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.amount, 50.0);
        assert_eq!(updated.note.as_deref(), Some("groceries"));
        // Unspecified fields are untouched
        assert_eq!(updated.category, "food");

        db.delete_transaction(tx.id).unwrap();
        assert!(db.get_transaction(tx.id).unwrap().is_none());
        assert!(matches!(
            db.delete_transaction(tx.id),
            Err(crate::Error::NotFound(_))
        ));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let db = Database::in_memory().unwrap();
        let user = seed_user(&db);

        let result = db.insert_transaction(
            user.id,
            &new_tx(TransactionType::Expense, -5.0, "food", date(2025, 3, 1)),
        );
        assert!(matches!(result, Err(crate::Error::InvalidData(_))));
    }

    #[test]
    fn test_list_transactions_ordering_and_filters() {
        let db = Database::in_memory().unwrap();
        let user = seed_user(&db);

        db.insert_transaction(
            user.id,
            &new_tx(TransactionType::Expense, 10.0, "food", date(2025, 3, 5)),
        )
        .unwrap();
        db.insert_transaction(
            user.id,
            &new_tx(TransactionType::Income, 100.0, "salary", date(2025, 3, 20)),
        )
        .unwrap();
        db.insert_transaction(
            user.id,
            &new_tx(TransactionType::Expense, 20.0, "rent", date(2025, 2, 28)),
        )
        .unwrap();

        // Newest first
        let all = db
            .list_transactions(user.id, &TransactionFilter::default())
            .unwrap();
        let dates: Vec<_> = all.iter().map(|t| t.date).collect();
        assert_eq!(
            dates,
            vec![date(2025, 3, 20), date(2025, 3, 5), date(2025, 2, 28)]
        );

        // Type filter
        let expenses = db
            .list_transactions(
                user.id,
                &TransactionFilter::default().kind(TransactionType::Expense),
            )
            .unwrap();
        assert_eq!(expenses.len(), 2);

        // Half-open window: Feb 28 included, Mar 20 included, window end excluded
        let march = db
            .list_transactions(
                user.id,
                &TransactionFilter::default().date_range(date(2025, 3, 1), date(2025, 4, 1)),
            )
            .unwrap();
        assert_eq!(march.len(), 2);
    }

    #[test]
    fn test_transactions_are_scoped_to_their_user() {
        let db = Database::in_memory().unwrap();
        let alice = seed_user(&db);
        let bob = db.create_user("bob@example.com", "Bob", "hash").unwrap();

        db.insert_transaction(
            alice.id,
            &new_tx(TransactionType::Expense, 10.0, "food", date(2025, 3, 5)),
        )
        .unwrap();

        let bobs = db
            .list_transactions(bob.id, &TransactionFilter::default())
            .unwrap();
        assert!(bobs.is_empty());
    }

    #[test]
    fn test_set_budget_upsert_is_idempotent() {
        let db = Database::in_memory().unwrap();
        let user = seed_user(&db);

        let first = db.set_budget(user.id, month("2025-03"), 500.0).unwrap();
        let second = db.set_budget(user.id, month("2025-03"), 500.0).unwrap();

        // One row, same identity, created_at preserved
        assert_eq!(db.count_budgets().unwrap(), 1);
        assert_eq!(second.id, first.id);
        assert_eq!(second.created_at, first.created_at);
        assert_eq!(second.limit_amount, 500.0);

        let raised = db.set_budget(user.id, month("2025-03"), 800.0).unwrap();
        assert_eq!(raised.id, first.id);
        assert_eq!(raised.limit_amount, 800.0);
    }

    #[test]
    fn test_set_budget_rejects_non_positive_limit() {
        let db = Database::in_memory().unwrap();
        let user = seed_user(&db);

        for bad in [0.0, -100.0, f64::NAN, f64::INFINITY] {
            let result = db.set_budget(user.id, month("2025-03"), bad);
            assert!(matches!(result, Err(crate::Error::InvalidData(_))));
        }
    }

    #[test]
    fn test_budget_status_not_found_without_budget() {
        let db = Database::in_memory().unwrap();
        let user = seed_user(&db);

        let result = db.get_budget_status(user.id, month("2025-03"));
        assert!(matches!(result, Err(crate::Error::NotFound(_))));
    }

    #[test]
    fn test_budget_status_sums_month_expenses() {
        let db = Database::in_memory().unwrap();
        let user = seed_user(&db);
        db.set_budget(user.id, month("2025-03"), 500.0).unwrap();

        db.insert_transaction(
            user.id,
            &new_tx(TransactionType::Expense, 300.0, "rent", date(2025, 3, 2)),
        )
        .unwrap();
        db.insert_transaction(
            user.id,
            &new_tx(TransactionType::Expense, 250.0, "travel", date(2025, 3, 28)),
        )
        .unwrap();
        // Income and other months don't count
        db.insert_transaction(
            user.id,
            &new_tx(TransactionType::Income, 1000.0, "salary", date(2025, 3, 1)),
        )
        .unwrap();
        db.insert_transaction(
            user.id,
            &new_tx(TransactionType::Expense, 99.0, "food", date(2025, 4, 1)),
        )
        .unwrap();

        let status = db.get_budget_status(user.id, month("2025-03")).unwrap();
        assert_eq!(status.budget.spent, 550.0);
        assert_eq!(status.alert, AlertLevel::Exceeded);

        // Write-through: the stored row carries the refreshed value
        let stored = db.find_budget(user.id, month("2025-03")).unwrap().unwrap();
        assert_eq!(stored.spent, 550.0);
    }

    #[test]
    fn test_budget_status_with_no_expenses_is_zero() {
        let db = Database::in_memory().unwrap();
        let user = seed_user(&db);
        db.set_budget(user.id, month("2025-03"), 500.0).unwrap();

        let status = db.get_budget_status(user.id, month("2025-03")).unwrap();
        assert_eq!(status.budget.spent, 0.0);
        assert_eq!(status.alert, AlertLevel::None);
    }

    #[test]
    fn test_budget_window_edges() {
        let db = Database::in_memory().unwrap();
        let user = seed_user(&db);
        db.set_budget(user.id, month("2024-12"), 1000.0).unwrap();

        // Last day of December counts, first day of January does not
        db.insert_transaction(
            user.id,
            &new_tx(TransactionType::Expense, 100.0, "gifts", date(2024, 12, 31)),
        )
        .unwrap();
        db.insert_transaction(
            user.id,
            &new_tx(TransactionType::Expense, 999.0, "sales", date(2025, 1, 1)),
        )
        .unwrap();

        let status = db.get_budget_status(user.id, month("2024-12")).unwrap();
        assert_eq!(status.budget.spent, 100.0);
    }

    #[test]
    fn test_budget_alert_bands() {
        let db = Database::in_memory().unwrap();
        let user = seed_user(&db);
        db.set_budget(user.id, month("2025-05"), 100.0).unwrap();

        db.insert_transaction(
            user.id,
            &new_tx(TransactionType::Expense, 79.0, "food", date(2025, 5, 10)),
        )
        .unwrap();
        let status = db.get_budget_status(user.id, month("2025-05")).unwrap();
        assert_eq!(status.alert, AlertLevel::None);

        db.insert_transaction(
            user.id,
            &new_tx(TransactionType::Expense, 1.0, "food", date(2025, 5, 11)),
        )
        .unwrap();
        let status = db.get_budget_status(user.id, month("2025-05")).unwrap();
        assert_eq!(status.alert, AlertLevel::NearLimit);

        db.insert_transaction(
            user.id,
            &new_tx(TransactionType::Expense, 20.0, "food", date(2025, 5, 12)),
        )
        .unwrap();
        let status = db.get_budget_status(user.id, month("2025-05")).unwrap();
        assert_eq!(status.alert, AlertLevel::Exceeded);
    }

    #[test]
    fn test_budgets_are_scoped_to_their_user() {
        let db = Database::in_memory().unwrap();
        let alice = seed_user(&db);
        let bob = db.create_user("bob@example.com", "Bob", "hash").unwrap();

        db.set_budget(alice.id, month("2025-03"), 500.0).unwrap();

        assert!(db.find_budget(bob.id, month("2025-03")).unwrap().is_none());
        assert!(matches!(
            db.get_budget_status(bob.id, month("2025-03")),
            Err(crate::Error::NotFound(_))
        ));
    }
}
