pub fn group_balances_key(group_id: &str) -> String {
    format!("group_balances:{}", group_id)
}
