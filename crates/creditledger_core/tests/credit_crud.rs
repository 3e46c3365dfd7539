use creditledger_core::db::open_db_in_memory;
use creditledger_core::{
    CreditRepository, LedgerService, NewTransaction, RepoError, SqliteCreditRepository,
};
use std::collections::HashSet;

#[test]
fn add_then_list_shows_exactly_one_new_row() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCreditRepository::new(&conn);

    let id = repo
        .add_transaction(&NewTransaction::new("Ash", "skin", 500))
        .unwrap();

    let all = repo.list_transactions().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, id);
    assert_eq!(all[0].operator, "Ash");
    assert_eq!(all[0].item, "skin");
    assert_eq!(all[0].amount, 500);
}

#[test]
fn assigned_ids_are_unique_and_listing_preserves_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCreditRepository::new(&conn);

    let mut ids = Vec::new();
    for (operator, item, amount) in [
        ("Ash", "skin", 500),
        ("Thermite", "charm", 300),
        ("Ash", "pack", 1200),
    ] {
        ids.push(
            repo.add_transaction(&NewTransaction::new(operator, item, amount))
                .unwrap(),
        );
    }

    let unique: HashSet<_> = ids.iter().copied().collect();
    assert_eq!(unique.len(), ids.len());

    let listed: Vec<_> = repo
        .list_transactions()
        .unwrap()
        .into_iter()
        .map(|transaction| transaction.id)
        .collect();
    assert_eq!(listed, ids);
}

#[test]
fn find_by_operator_is_case_sensitive_exact_match() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCreditRepository::new(&conn);

    repo.add_transaction(&NewTransaction::new("Ash", "skin", 500))
        .unwrap();
    repo.add_transaction(&NewTransaction::new("ash", "charm", 100))
        .unwrap();
    repo.add_transaction(&NewTransaction::new("Thermite", "pack", 900))
        .unwrap();

    let found = repo.transactions_by_operator("Ash").unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].operator, "Ash");

    assert!(repo.transactions_by_operator("Doc").unwrap().is_empty());
}

#[test]
fn highest_spend_returns_maximal_amount_row() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCreditRepository::new(&conn);

    repo.add_transaction(&NewTransaction::new("Ash", "skin", 500))
        .unwrap();
    repo.add_transaction(&NewTransaction::new("Ash", "charm", 1200))
        .unwrap();
    repo.add_transaction(&NewTransaction::new("Thermite", "pack", 5000))
        .unwrap();

    let top = repo.highest_spend("Ash").unwrap().unwrap();
    assert_eq!(top.amount, 1200);
    assert_eq!(top.item, "charm");

    assert!(repo.highest_spend("Doc").unwrap().is_none());
}

#[test]
fn highest_spend_breaks_ties_by_lowest_id() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCreditRepository::new(&conn);

    let first = repo
        .add_transaction(&NewTransaction::new("Ash", "skin", 700))
        .unwrap();
    repo.add_transaction(&NewTransaction::new("Ash", "charm", 700))
        .unwrap();

    let top = repo.highest_spend("Ash").unwrap().unwrap();
    assert_eq!(top.id, first);
}

#[test]
fn total_credits_sums_all_rows_and_is_zero_when_empty() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCreditRepository::new(&conn);

    assert_eq!(repo.total_credits().unwrap(), 0);

    repo.add_transaction(&NewTransaction::new("Ash", "skin", 500))
        .unwrap();
    repo.add_transaction(&NewTransaction::new("Thermite", "charm", 300))
        .unwrap();
    repo.add_transaction(&NewTransaction::new("Ash", "refund", -100))
        .unwrap();

    assert_eq!(repo.total_credits().unwrap(), 700);
}

#[test]
fn delete_by_id_removes_exactly_one_row_and_missing_id_is_noop() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCreditRepository::new(&conn);

    let keep = repo
        .add_transaction(&NewTransaction::new("Ash", "skin", 500))
        .unwrap();
    let remove = repo
        .add_transaction(&NewTransaction::new("Ash", "charm", 300))
        .unwrap();

    assert!(repo.delete_by_id(remove).unwrap());

    let remaining = repo.list_transactions().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, keep);

    assert!(!repo.delete_by_id(remove).unwrap());
    assert_eq!(repo.list_transactions().unwrap().len(), 1);
}

#[test]
fn delete_by_operator_removes_all_matching_rows_and_no_others() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCreditRepository::new(&conn);

    repo.add_transaction(&NewTransaction::new("Ash", "skin", 500))
        .unwrap();
    repo.add_transaction(&NewTransaction::new("Ash", "charm", 300))
        .unwrap();
    repo.add_transaction(&NewTransaction::new("Thermite", "pack", 900))
        .unwrap();

    assert_eq!(repo.delete_by_operator("Ash").unwrap(), 2);

    let remaining = repo.list_transactions().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].operator, "Thermite");

    assert_eq!(repo.delete_by_operator("Doc").unwrap(), 0);
}

#[test]
fn clear_all_empties_the_table() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCreditRepository::new(&conn);

    repo.add_transaction(&NewTransaction::new("Ash", "skin", 500))
        .unwrap();
    repo.add_transaction(&NewTransaction::new("Thermite", "charm", 300))
        .unwrap();

    assert_eq!(repo.clear_all().unwrap(), 2);
    assert!(repo.list_transactions().unwrap().is_empty());
    assert_eq!(repo.total_credits().unwrap(), 0);
}

#[test]
fn validation_failure_blocks_insert() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCreditRepository::new(&conn);

    let err = repo
        .add_transaction(&NewTransaction::new("", "skin", 500))
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
    assert!(repo.list_transactions().unwrap().is_empty());
}

#[test]
fn service_delegates_to_repository() {
    let conn = open_db_in_memory().unwrap();
    let service = LedgerService::new(SqliteCreditRepository::new(&conn));

    let id = service
        .add_transaction(&NewTransaction::new("Ash", "skin", 500))
        .unwrap();
    assert_eq!(service.total_credits().unwrap(), 500);
    assert_eq!(service.transactions_by_operator("Ash").unwrap().len(), 1);
    assert!(service.delete_by_id(id).unwrap());
    assert_eq!(service.clear_all().unwrap(), 0);
}
