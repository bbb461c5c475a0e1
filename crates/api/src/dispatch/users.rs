//! User lookup, registration, and logins.

use gateway_core::input::normalize_whatsapp;
use gateway_core::{find_user_by_phone, phone_key, public_user, Error, Record, Result, Role, Table};
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use crate::params::Params;
use crate::response::Envelope;
use crate::state::AppState;

fn short_code(len: usize) -> String {
    let mut code = Uuid::new_v4().simple().to_string();
    code.truncate(len);
    code
}

/// The user as returned to its owner: public fields plus the session token.
fn own_user(user: &Record) -> Record {
    public_user(user).with("Token", user.text("Token"))
}

/// A fresh `user` row. The id is the table's row count at creation, header
/// included, so the first user gets id 1.
fn new_user(id: i64, phone: &str, referrer: &str) -> Record {
    Record::new()
        .with("ID", id)
        .with("Phone", phone)
        .with("ReferralCode", short_code(8).to_uppercase())
        .with("Referrer", referrer)
        .with("Role", Role::User.as_str())
        .with("Password", "")
        .with("HasCommission", false)
        .with("Token", Uuid::new_v4().to_string())
        .with("CreatedAt", chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string())
}

pub(super) async fn get_or_create_user(state: &AppState, params: &Params) -> Result<Envelope> {
    let phone = normalize_whatsapp(&params.require_of(&["whatsapp", "phone"])?)?;

    let users = state.tables.snapshot(Table::Users).await?;
    if let Some(user) = find_user_by_phone(&users.records, &phone) {
        debug!(user_id = %user.key("ID"), "Existing user");
        return Envelope::data(&public_user(user));
    }

    let referrer = params
        .text_of(&["referrer", "ref", "referralCode"])
        .unwrap_or_default();
    let lookup = phone.clone();
    let created = state
        .tables
        .append_with(Table::Users, move |layout| {
            // Another request may have registered the number since the
            // snapshot was taken.
            if find_user_by_phone(&layout.records, &lookup).is_some() {
                return Ok(Vec::new());
            }
            Ok(vec![new_user(layout.row_count as i64, &lookup, &referrer)])
        })
        .await?;

    if let Some(user) = created.first() {
        info!(user_id = %user.key("ID"), "User created");
        return Ok(Envelope::data(&own_user(user))?.with_message("User created"));
    }

    let users = state.tables.snapshot(Table::Users).await?;
    let user = find_user_by_phone(&users.records, &phone)
        .ok_or_else(|| Error::internal("user vanished after registration"))?;
    Envelope::data(&public_user(user))
}

pub(super) async fn verify_login(state: &AppState, params: &Params) -> Result<Envelope> {
    let phone = normalize_whatsapp(&params.require_of(&["whatsapp", "phone"])?)?;
    let password = params.require("password")?;

    let users = state.tables.snapshot(Table::Users).await?;
    let user = find_user_by_phone(&users.records, &phone)
        .ok_or_else(|| Error::not_found("User not found"))?;

    let stored = user.text("Password");
    if stored.is_empty() || stored != password {
        return Err(Error::unauthorized("Invalid password"));
    }
    if user.flag("HasCommission") != Some(true) {
        return Err(Error::unauthorized("Commission access is not enabled for this user"));
    }

    Ok(Envelope::data(&own_user(user))?.with_message("Login successful"))
}

pub(super) async fn get_user_by_phone(state: &AppState, params: &Params) -> Result<Envelope> {
    let phone = params.require_of(&["phone", "whatsapp"])?;

    let users = state.tables.snapshot(Table::Users).await?;
    let user = find_user_by_phone(&users.records, &phone)
        .ok_or_else(|| Error::not_found("User not found"))?;
    Envelope::data(&public_user(user))
}

/// A throwaway guest identity; nothing is written.
pub(super) fn create_anonymous_user() -> Result<Envelope> {
    let id = format!(
        "guest_{}_{}",
        chrono::Utc::now().timestamp_millis(),
        short_code(9)
    );
    Ok(Envelope::ok(json!({
        "id": id,
        "role": Role::Guest.as_str(),
        "token": Uuid::new_v4().to_string(),
    })))
}

pub(super) async fn admin_login(state: &AppState, params: &Params) -> Result<Envelope> {
    let username = params.require("username")?;
    let password = params.require("password")?;
    let denied = || Error::unauthorized("Invalid admin credentials");

    if let Some(configured) = state.admin.configured_password() {
        if username != state.admin.username || password != configured {
            return Err(denied());
        }
    } else {
        let users = state.tables.snapshot(Table::Users).await?;
        let wanted = phone_key(&username);
        users
            .records
            .iter()
            .filter(|u| Role::of(u) == Some(Role::Admin))
            .filter(|u| {
                (!wanted.is_empty() && phone_key(&u.text("Phone")) == wanted)
                    || u.text("ReferralCode") == username
            })
            .find(|u| {
                let stored = u.text("Password");
                !stored.is_empty() && stored == password
            })
            .ok_or_else(denied)?;
    }

    info!(username = %username, "Admin login");
    Ok(Envelope::ok(json!({
        "username": username,
        "role": Role::Admin.as_str(),
        "token": Uuid::new_v4().to_string(),
    }))
    .with_message("Login successful"))
}
