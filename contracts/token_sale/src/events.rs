use soroban_sdk::{contracttype, symbol_short, Address, Env};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokensPurchased {
    pub buyer: Address,
    pub pay_token: Address,
    pub usd_amount: i128,
    pub token_amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StageAdded {
    pub index: u32,
    pub rate: i128,
    pub cap: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StageAdvanced {
    pub index: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SaleFinalized {
    pub total_raised: i128,
    pub total_tokens_sold: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FundsWithdrawn {
    pub token: Address,
    pub to: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EndTimeUpdated {
    pub end_time: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MaxPurchaseUpdated {
    pub max_purchase: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PaymentTokenRegistered {
    pub token: Address,
    pub feed: Address,
}

pub fn emit_tokens_purchased(
    env: &Env,
    buyer: Address,
    pay_token: Address,
    usd_amount: i128,
    token_amount: i128,
) {
    let topics = (symbol_short!("purchase"), buyer.clone());
    let data = TokensPurchased {
        buyer,
        pay_token,
        usd_amount,
        token_amount,
    };
    env.events().publish(topics, data);
}

pub fn emit_stage_added(env: &Env, index: u32, rate: i128, cap: i128) {
    let topics = (symbol_short!("stage_add"), index);
    let data = StageAdded { index, rate, cap };
    env.events().publish(topics, data);
}

pub fn emit_stage_advanced(env: &Env, index: u32) {
    let topics = (symbol_short!("stage_adv"), index);
    let data = StageAdvanced { index };
    env.events().publish(topics, data);
}

pub fn emit_sale_finalized(env: &Env, total_raised: i128, total_tokens_sold: i128) {
    let topics = (symbol_short!("finalized"),);
    let data = SaleFinalized {
        total_raised,
        total_tokens_sold,
    };
    env.events().publish(topics, data);
}

pub fn emit_funds_withdrawn(env: &Env, token: Address, to: Address, amount: i128) {
    let topics = (symbol_short!("withdrawn"), token.clone());
    let data = FundsWithdrawn { token, to, amount };
    env.events().publish(topics, data);
}

pub fn emit_end_time_updated(env: &Env, end_time: u64) {
    let topics = (symbol_short!("end_time"),);
    env.events().publish(topics, EndTimeUpdated { end_time });
}

pub fn emit_max_purchase_updated(env: &Env, max_purchase: i128) {
    let topics = (symbol_short!("limit"),);
    env.events().publish(topics, MaxPurchaseUpdated { max_purchase });
}

pub fn emit_payment_token_registered(env: &Env, token: Address, feed: Address) {
    let topics = (symbol_short!("tok_reg"), token.clone());
    env.events()
        .publish(topics, PaymentTokenRegistered { token, feed });
}

pub fn emit_payment_token_enabled(env: &Env, token: Address) {
    env.events()
        .publish((symbol_short!("tok_on"), token.clone()), token);
}

pub fn emit_payment_token_disabled(env: &Env, token: Address) {
    env.events()
        .publish((symbol_short!("tok_off"), token.clone()), token);
}

pub fn emit_sale_paused(env: &Env, by: Address) {
    env.events().publish((symbol_short!("paused"),), by);
}

pub fn emit_sale_unpaused(env: &Env, by: Address) {
    env.events().publish((symbol_short!("unpaused"),), by);
}
