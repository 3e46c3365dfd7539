//! Output formatting for session responses.

use creditledger_core::Transaction;

/// Format the full transaction listing for display.
pub fn format_transaction_list(transactions: &[Transaction]) -> String {
    if transactions.is_empty() {
        return "No transactions found.".to_string();
    }

    let mut output = String::from("\nAll Transactions:\n");
    for transaction in transactions {
        output.push_str(&format!(
            "ID: {}, Operator: {}, Item: {}, Amount: {} credits\n",
            transaction.id, transaction.operator, transaction.item, transaction.amount
        ));
    }
    output
}

/// Format one operator's transactions for display.
pub fn format_operator_transactions(operator: &str, transactions: &[Transaction]) -> String {
    if transactions.is_empty() {
        return format!("No transactions found for operator '{operator}'.");
    }

    let mut output = format!("\nTransactions for operator '{operator}':\n");
    for transaction in transactions {
        output.push_str(&format!(
            "ID: {}, Item: {}, Amount: {} credits\n",
            transaction.id, transaction.item, transaction.amount
        ));
    }
    output
}

/// Format the highest-spend lookup result for display.
pub fn format_highest_spend(operator: &str, result: Option<&Transaction>) -> String {
    match result {
        Some(transaction) => format!(
            "The highest credit spend for operator {operator} is: {} credits.",
            transaction.amount
        ),
        None => format!("No transactions found for operator '{operator}'."),
    }
}

/// Format the all-time credit total for display.
pub fn format_total_credits(total: i64) -> String {
    format!("The total credits spent across all transactions is: {total} credits.")
}
