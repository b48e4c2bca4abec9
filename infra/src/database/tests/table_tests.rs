use idn_core::domain::entities::AccountType;

use crate::database::mysql::{account_table, verification_token_table};

#[test]
fn test_populations_never_share_tables() {
    assert_eq!(account_table(AccountType::Primary), "users");
    assert_eq!(account_table(AccountType::Operator), "system_users");
    assert_eq!(verification_token_table(AccountType::Primary), "verification_token");
    assert_eq!(
        verification_token_table(AccountType::Operator),
        "system_verification_token"
    );
}
