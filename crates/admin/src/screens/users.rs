//! User management screen.

use crm_console_core::User;

use super::Console;
use crate::components::users_table_config;
use crate::controller::DataView;

pub type UsersScreen = DataView<User>;

impl DataView<User> {
    #[must_use]
    pub fn users(console: &Console) -> Self {
        Self::new(
            console.client().clone(),
            users_table_config(),
            console.page_size(),
        )
    }
}
