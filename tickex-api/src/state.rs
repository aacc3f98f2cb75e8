use std::sync::Arc;

use tickex_core::accounts::AccountService;
use tickex_core::tickets::TicketService;

use crate::token::TokenService;

#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<AccountService>,
    pub tickets: Arc<TicketService>,
    pub auth: TokenService,
}
