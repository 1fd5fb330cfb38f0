//! `lobby`: drive the casino lobby account flows from a terminal.
//!
//! User-facing output goes to stdout; logs go to stderr.

use std::io::{self, Write};

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use casino_lobby::config::AppConfig;
use casino_lobby::handlers::{account, auth, funds, lobby, vip, wallet};
use casino_lobby::models::bank_account::NewBankAccount;
use casino_lobby::models::game::GameCategory;
use casino_lobby::models::user::ProfileUpdate;
use casino_lobby::services::auth_service::{Credentials, LoginMethod};
use casino_lobby::services::history::HistoryFilter;
use casino_lobby::services::ledger::format_amount;
use casino_lobby::services::requests::{DepositForm, WithdrawalForm};
use casino_lobby::{AppError, AppState};

#[derive(Parser, Debug)]
#[command(name = "lobby")]
#[command(version, about = "Casino lobby account client", long_about = None)]
struct Cli {
    #[command(flatten)]
    login: LoginArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct LoginArgs {
    /// Account email.
    #[arg(long, global = true, env = "LOBBY_EMAIL")]
    email: Option<String>,

    /// Account phone number; takes precedence over email.
    #[arg(long, global = true, env = "LOBBY_PHONE")]
    phone: Option<String>,

    #[arg(long, global = true, env = "LOBBY_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Access token from a previous `sign-in`.
    #[arg(long, global = true, env = "LOBBY_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    #[arg(long, global = true, env = "LOBBY_REFRESH_TOKEN", hide_env_values = true)]
    refresh_token: Option<String>,
}

impl LoginArgs {
    fn credentials(&self) -> Credentials {
        let method = if self.phone.is_some() {
            LoginMethod::Phone
        } else {
            LoginMethod::Email
        };
        Credentials {
            method,
            email: self.email.clone().unwrap_or_default(),
            phone: self.phone.clone().unwrap_or_default(),
            password: self.password.clone().unwrap_or_default(),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and print the session tokens.
    SignIn,
    /// Create an account.
    Register {
        /// Agree to the Terms & Conditions.
        #[arg(long)]
        agree: bool,
    },
    SignOut,
    /// Show the signed-in account.
    Me,
    /// Wallet balances and recent activity.
    Balance,
    /// VIP level and progress to the next one.
    Vip,
    /// Search transaction history (defaults to the last 7 days).
    History {
        /// First day, YYYY-MM-DD.
        #[arg(long)]
        from: Option<String>,
        /// Last day, YYYY-MM-DD.
        #[arg(long)]
        to: Option<String>,
        #[arg(long = "type", default_value = "all")]
        kind: String,
        #[arg(long, default_value = "all")]
        status: String,
    },
    /// Request a deposit, optionally attaching a receipt.
    Deposit {
        amount: String,
        #[arg(long)]
        receipt: Option<std::path::PathBuf>,
    },
    /// Request a withdrawal to a saved bank account.
    Withdraw {
        amount: String,
        #[arg(long)]
        bank_account: Option<i64>,
    },
    /// List saved bank accounts.
    Banks,
    AddBank {
        #[arg(long)]
        bank_name: String,
        #[arg(long)]
        account_name: String,
        #[arg(long)]
        account_number: String,
        #[arg(long)]
        bsb: Option<String>,
    },
    /// Show where to send deposits.
    DepositBank,
    /// Update personal details.
    Profile {
        #[arg(long)]
        real_name: Option<String>,
        #[arg(long)]
        gender: Option<String>,
        /// Date of birth, YYYY-MM-DD.
        #[arg(long)]
        dob: Option<String>,
    },
    Password {
        new_password: String,
    },
    /// Browse the game catalog.
    Games {
        #[arg(long, default_value = "lobby")]
        category: String,
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Show the bank alert and home banners.
    Announcement,
    /// Print the loaded configuration.
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("casino_lobby=info,lobby=info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env().context("failed to load configuration")?;
    info!(version = env!("CARGO_PKG_VERSION"), "Starting lobby");

    let state = AppState::connect(config).await?;

    if let Err(err) = run(&state, &cli).await {
        if let Some(app) = err.downcast_ref::<AppError>() {
            if !app.is_validation() {
                error!("❌ {}", app);
            }
            eprintln!("{}", app.user_message());
            std::process::exit(1);
        }
        return Err(err);
    }
    Ok(())
}

fn parse_day(raw: &str) -> Result<NaiveDate, AppError> {
    Ok(NaiveDate::parse_from_str(raw, "%Y-%m-%d")?)
}

/// Restore a saved session or sign in with the given credentials.
async fn ensure_signed_in(state: &AppState, login: &LoginArgs) -> Result<(), AppError> {
    if let (Some(access), Some(refresh)) = (&login.access_token, &login.refresh_token) {
        auth::restore_session(state, access, refresh).await?;
        return Ok(());
    }
    if login.password.is_some() {
        auth::sign_in(state, &login.credentials()).await?;
        return Ok(());
    }
    Err(AppError::NotSignedIn)
}

async fn run(state: &AppState, cli: &Cli) -> anyhow::Result<()> {
    let mut out = io::stdout();

    match &cli.command {
        Command::SignIn => {
            let session = auth::sign_in(state, &cli.login.credentials()).await?;
            writeln!(out, "Signed in as {}", session.user.email.as_deref().unwrap_or(&session.user.id))?;
            writeln!(out, "export LOBBY_ACCESS_TOKEN={}", session.access_token)?;
            writeln!(out, "export LOBBY_REFRESH_TOKEN={}", session.refresh_token)?;
        }
        Command::Register { agree } => {
            let registration = auth::Registration {
                credentials: cli.login.credentials(),
                agreed_to_terms: *agree,
            };
            match auth::register(state, &registration).await? {
                auth::RegisterOutcome::SignedIn(session) => {
                    writeln!(out, "Account created.")?;
                    writeln!(out, "export LOBBY_ACCESS_TOKEN={}", session.access_token)?;
                    writeln!(out, "export LOBBY_REFRESH_TOKEN={}", session.refresh_token)?;
                }
                auth::RegisterOutcome::ConfirmationRequired => {
                    writeln!(out, "Account created. Confirm it before signing in.")?;
                }
            }
        }
        Command::SignOut => {
            ensure_signed_in(state, &cli.login).await?;
            auth::sign_out(state).await?;
            writeln!(out, "Signed out.")?;
        }
        Command::Me => {
            ensure_signed_in(state, &cli.login).await?;
            let user = account::current_user(state).await?;
            writeln!(out, "ID:       {}", user.display_id())?;
            writeln!(out, "Username: {}", user.username)?;
            writeln!(out, "Email:    {}", user.email)?;
            writeln!(out, "Phone:    {}", user.contact_number())?;
            if let Some(name) = &user.real_name {
                writeln!(out, "Name:     {}", name)?;
            }
        }
        Command::Balance => {
            ensure_signed_in(state, &cli.login).await?;
            let overview = wallet::wallet_overview(state).await?;
            let summary = &overview.summary;
            writeln!(out, "Balance:      {}", summary.display())?;
            writeln!(out, "  real:       {}", format_amount(summary.real))?;
            writeln!(out, "  bonus:      {}", format_amount(summary.bonus))?;
            writeln!(out, "Withdrawable: {}", format_amount(overview.max_withdrawable))?;
            writeln!(out, "Recent activity:")?;
            if overview.recent.is_empty() {
                writeln!(out, "  (none)")?;
            }
            for tx in &overview.recent {
                writeln!(
                    out,
                    "  {}  {:<10} {:>12}  {}",
                    tx.created_at.format("%Y-%m-%d %H:%M"),
                    tx.transaction_type,
                    tx.signed_amount(),
                    tx.status
                )?;
            }
        }
        Command::Vip => {
            ensure_signed_in(state, &cli.login).await?;
            let overview = vip::vip_overview(state).await?;
            let progress = &overview.progress;
            writeln!(
                out,
                "Level {} {}",
                progress.current_level_id,
                progress.current_level_name.as_deref().unwrap_or("")
            )?;
            writeln!(out, "Daily rebate: {}%", progress.daily_rebate_rate)?;
            if let Some(eligible) = progress.eligible_level_id.filter(|id| *id > progress.current_level_id) {
                writeln!(out, "Qualifies for level {} (awaiting promotion)", eligible)?;
            }
            match (&progress.next_level, progress.turnover_needed) {
                (Some(next), Some(needed)) => {
                    writeln!(out, "Next: {} ({:.0}%)", next.level_name, progress.progress_percent)?;
                    writeln!(out, "Turnover needed: {}", format_amount(needed))?;
                }
                _ => writeln!(out, "Maximum level reached.")?,
            }
        }
        Command::History { from, to, kind, status } => {
            ensure_signed_in(state, &cli.login).await?;
            let mut filter = HistoryFilter::trailing_week(Utc::now().date_naive());
            if let Some(from) = from {
                filter.start_date = parse_day(from)?;
            }
            if let Some(to) = to {
                filter.end_date = parse_day(to)?;
            }
            filter.transaction_type = kind.parse()?;
            filter.status = status.parse()?;

            let rows = wallet::search_history(state, &filter).await?;
            if rows.is_empty() {
                writeln!(out, "No transactions found.")?;
            }
            for tx in rows {
                writeln!(
                    out,
                    "{}  #{:<8} {:<10} {:>12}  {:<8} {}",
                    tx.created_at.format("%Y-%m-%d %H:%M"),
                    tx.transaction_id,
                    tx.transaction_type,
                    tx.signed_amount(),
                    tx.status,
                    tx.payment_method
                )?;
            }
        }
        Command::Deposit { amount, receipt } => {
            ensure_signed_in(state, &cli.login).await?;
            let upload = match receipt {
                Some(path) => Some(funds::ReceiptUpload {
                    file_name: path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default(),
                    data: tokio::fs::read(path)
                        .await
                        .with_context(|| format!("failed to read {}", path.display()))?,
                }),
                None => None,
            };
            let form = DepositForm { amount: amount.clone() };
            let request = funds::submit_deposit(state, &form, upload).await?;
            writeln!(out, "Deposit request for {} submitted.", format_amount(request.amount))?;
        }
        Command::Withdraw { amount, bank_account } => {
            ensure_signed_in(state, &cli.login).await?;
            let form = WithdrawalForm {
                amount: amount.clone(),
                bank_account_id: *bank_account,
            };
            let request = funds::submit_withdrawal(state, &form).await?;
            writeln!(out, "Withdrawal request for {} submitted.", format_amount(request.amount))?;
        }
        Command::Banks => {
            ensure_signed_in(state, &cli.login).await?;
            let accounts = account::list_bank_accounts(state).await?;
            if accounts.is_empty() {
                writeln!(out, "No bank accounts saved.")?;
            }
            for acc in accounts {
                writeln!(
                    out,
                    "{:>4}  {}{}",
                    acc.id.map(|id| id.to_string()).unwrap_or_default(),
                    acc.masked_label(),
                    if acc.is_verified { "  (verified)" } else { "" }
                )?;
            }
        }
        Command::AddBank {
            bank_name,
            account_name,
            account_number,
            bsb,
        } => {
            ensure_signed_in(state, &cli.login).await?;
            let form = NewBankAccount {
                user_id: String::new(),
                bank_name: bank_name.clone(),
                account_name: account_name.clone(),
                account_number: account_number.clone(),
                bsb: bsb.clone(),
            };
            let saved = account::add_bank_account(state, form).await?;
            writeln!(out, "Bank account added: {}", saved.masked_label())?;
        }
        Command::DepositBank => {
            let bank = funds::deposit_bank_details(state).await?;
            writeln!(out, "Account name: {}", bank.acc_name)?;
            if let Some(payid) = &bank.payid {
                writeln!(out, "PayID:        {}", payid)?;
            }
            if let Some(bsb) = &bank.bsb {
                writeln!(out, "BSB:          {}", bsb)?;
            }
            if let Some(num) = &bank.acc_num {
                writeln!(out, "Account no.:  {}", num)?;
            }
        }
        Command::Profile { real_name, gender, dob } => {
            ensure_signed_in(state, &cli.login).await?;
            let update = ProfileUpdate {
                real_name: real_name.clone(),
                gender: gender.clone(),
                dob: dob.as_deref().map(parse_day).transpose()?,
            };
            account::update_profile(state, &update).await?;
            writeln!(out, "Profile updated successfully!")?;
        }
        Command::Password { new_password } => {
            ensure_signed_in(state, &cli.login).await?;
            auth::change_password(state, new_password).await?;
            writeln!(out, "Password updated successfully!")?;
        }
        Command::Games { category, search } => {
            let category: GameCategory = category.parse()?;
            let games = lobby::games(state, category, search).await?;
            writeln!(out, "{} ({} games)", category.label(), games.len())?;
            for game in games {
                writeln!(out, "  {:>5}  {}", game.game_id, game.game_title)?;
            }
        }
        Command::Announcement => {
            if let Some(alert) = lobby::announcement(state).await? {
                writeln!(out, "[{}]", alert.title)?;
                if let Some(body) = &alert.body {
                    writeln!(out, "{}", body)?;
                }
                lobby::dismiss_announcement(state, alert.content_id);
            }
            for banner in lobby::home_banners(state).await? {
                writeln!(out, "* {}", banner.title)?;
            }
        }
        Command::Config => {
            writeln!(out, "{}", serde_json::to_string_pretty(&state.config.config_info())?)?;
        }
    }
    Ok(())
}
