//! Interactive shell session
//!
//! Drives the terminal client once an endpoint is configured: the session
//! gate decides between the login prompt and the shell, the authorization
//! router keeps the current page inside the user's pages, and each workflow
//! page keeps its own rows and overlay state between commands.
//!
//! Commands arrive from the readline loop, from `-c`, or from a command file.

use colored::*;
use fms_link::{ApprovalDecision, FmsClient, PageId, SessionStore, WorkflowRecord};
use indicatif::{ProgressBar, ProgressStyle};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{CompletionType, Config, EditMode, Editor, Helper};
use std::borrow::Cow;
use std::future::Future;
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::completer::AutoCompleter;
use crate::config::CLIConfiguration;
use crate::error::{CLIError, Result};
use crate::formatter::{OutputFormat, OutputFormatter};
use crate::gate::{describe_user, SessionGate};
use crate::history::CommandHistory;
use crate::pages::create_indent::{self, CreateIndentPage};
use crate::pages::dashboard::{DashboardPage, DashboardStats};
use crate::pages::{
    approve_indent, license, lifting, make_payment, search_columns, store_in, tally_entry,
    PendingList,
};
use crate::parser::{Command, CommandParser, FormFields};
use crate::router::{AuthorizationRouter, RouteView, ACCESS_DENIED_MESSAGE};
use crate::sidebar::{menu_entries, render_sidebar};

const HELP_TEXT: &str = "\
Navigation
  menu                          Pages you can open
  open <page>                   Open a page (loads its rows)
  list [search]                 Show the current page, optionally filtered
  show <row>                    Details of one row
  retry                         Fetch the current page again

Actions
  approve <row> | reject <row>  Decide a pending indent (approve-indent)
  lift <row> key=value...       billNo vendorName liftQty typeOfBill billAmount [photoOfBill=@file]
  store-in <row> key=value...   inQty unitOfMeasurement photoOfProduct=@file
  tally <row> key=value...      status=yes|no reason=...
  pay <row>                     Payment link of a billed item (make-payment)
  indent key=value...           indentorName areaOfMachine groupHead productName qty specifications
  master                        Option lists for the indent form
  history [search]              Indent history (create-indent)
  stats                         Workflow totals (dashboard)

Session
  format <table|json|csv>       Output format
  whoami                        Current user and pages
  logout                        Sign out
  quit                          Exit";

/// Pending rows of the list pages.
#[derive(Debug, Default)]
struct PageLists {
    approvals: PendingList,
    lifting: PendingList,
    store_in: PendingList,
    tally: PendingList,
    payments: PendingList,
}

impl PageLists {
    fn get(&self, page: PageId) -> Option<&PendingList> {
        match page {
            PageId::ApproveIndent => Some(&self.approvals),
            PageId::Lifting => Some(&self.lifting),
            PageId::StoreIn => Some(&self.store_in),
            PageId::TallyEntry => Some(&self.tally),
            PageId::MakePayment => Some(&self.payments),
            _ => None,
        }
    }

    fn get_mut(&mut self, page: PageId) -> Option<&mut PendingList> {
        match page {
            PageId::ApproveIndent => Some(&mut self.approvals),
            PageId::Lifting => Some(&mut self.lifting),
            PageId::StoreIn => Some(&mut self.store_in),
            PageId::TallyEntry => Some(&mut self.tally),
            PageId::MakePayment => Some(&mut self.payments),
            _ => None,
        }
    }

    fn iter_mut(&mut self) -> impl Iterator<Item = &mut PendingList> {
        [
            &mut self.approvals,
            &mut self.lifting,
            &mut self.store_in,
            &mut self.tally,
            &mut self.payments,
        ]
        .into_iter()
    }
}

/// Terminal session over one endpoint and one session store.
pub struct CLISession<S: SessionStore> {
    client: FmsClient,
    gate: SessionGate<S>,
    router: AuthorizationRouter,
    parser: CommandParser,
    formatter: OutputFormatter,
    config: CLIConfiguration,
    color: bool,
    animations: bool,
    interactive: bool,
    dashboard: DashboardPage,
    create_indent: CreateIndentPage,
    lists: PageLists,
    commands_executed: usize,
}

impl<S: SessionStore> CLISession<S> {
    /// Session positioned on the stored user's first page, or at the login
    /// prompt when no valid session is stored.
    pub fn new(
        client: FmsClient,
        store: S,
        config: CLIConfiguration,
        format: OutputFormat,
        color: bool,
    ) -> Self {
        let mut gate = SessionGate::new(store);
        let allowed_pages = gate
            .restore()
            .map(|user| user.allowed_pages.clone())
            .unwrap_or_default();

        Self {
            client,
            gate,
            router: AuthorizationRouter::new(allowed_pages),
            parser: CommandParser::new(),
            formatter: OutputFormatter::new(format, color),
            config,
            color,
            animations: true,
            interactive: false,
            dashboard: DashboardPage::new(),
            create_indent: CreateIndentPage::new(),
            lists: PageLists::default(),
            commands_executed: 0,
        }
    }

    /// Enable or disable spinners.
    pub fn with_animations(mut self, enabled: bool) -> Self {
        self.animations = enabled;
        self
    }

    pub fn gate(&self) -> &SessionGate<S> {
        &self.gate
    }

    pub fn router(&self) -> &AuthorizationRouter {
        &self.router
    }

    pub fn client(&self) -> &FmsClient {
        &self.client
    }

    /// Rows of a list page.
    pub fn pending(&self, page: PageId) -> Option<&PendingList> {
        match page {
            PageId::CreateIndent => Some(self.create_indent.history()),
            other => self.lists.get(other),
        }
    }

    pub fn commands_executed(&self) -> usize {
        self.commands_executed
    }

    /// Run the login action and open the session.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<()> {
        let user = with_loading(
            self.animations,
            self.config.loading_threshold(),
            "Signing in...",
            self.client.login(username, password),
        )
        .await?;

        let user = self.gate.login(user)?;
        self.router = AuthorizationRouter::new(user.allowed_pages.clone());
        self.reset_pages();
        Ok(())
    }

    pub fn logout(&mut self) {
        self.gate.logout();
        self.router = AuthorizationRouter::new(Vec::new());
        self.reset_pages();
    }

    fn reset_pages(&mut self) {
        self.dashboard = DashboardPage::new();
        self.create_indent = CreateIndentPage::new();
        self.lists = PageLists::default();
    }

    /// Parse and run one line, printing its output.
    ///
    /// Returns `Ok(false)` when the line asks to quit.
    pub async fn execute(&mut self, line: &str) -> Result<bool> {
        let command = self.parser.parse(line)?;
        if matches!(command, Command::Quit) {
            return Ok(false);
        }

        self.commands_executed += 1;
        let output = self.run_command(command).await?;
        if !output.is_empty() {
            println!("{}", output);
        }
        Ok(true)
    }

    /// Run every line of a command file. Blank lines and `#` comments are
    /// skipped; a failing line is reported and the next one runs.
    pub async fn execute_batch(&mut self, script: &str) -> Result<()> {
        for (index, line) in script.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match self.execute(line).await {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => {
                    log::debug!("[SHELL] Line {} failed: {}", index + 1, e);
                    eprintln!("{}", self.paint_error(&format!("✗ line {}: {}", index + 1, e)));
                }
            }
        }
        Ok(())
    }

    /// Run a parsed command and return the text to show.
    pub async fn run_command(&mut self, command: Command) -> Result<String> {
        self.dismiss_expired(Instant::now());

        match &command {
            Command::Help => return Ok(HELP_TEXT.to_string()),
            Command::Quit => return Ok(String::new()),
            Command::SetFormat(format) => {
                let format: OutputFormat = format.parse()?;
                self.formatter.set_format(format);
                return Ok(format!("Output format set to {}", format));
            }
            _ => {}
        }

        if !self.gate.is_logged_in() {
            return Err(CLIError::NotLoggedIn);
        }

        match command {
            Command::Menu => Ok(render_sidebar(
                &menu_entries(self.router.current_page(), self.router.allowed_pages()),
                self.color,
            )),
            Command::Open(page) => self.open_page(&page).await,
            Command::List(search) => self.show_current(search.as_deref(), false).await,
            Command::Retry => self.show_current(None, true).await,
            Command::Show(row) => self.show_row(row).await,
            Command::Approve(row) => self.decide(row, ApprovalDecision::Approve).await,
            Command::Reject(row) => self.decide(row, ApprovalDecision::Reject).await,
            Command::Lift { row, fields } => self.lift(row, &fields).await,
            Command::StoreIn { row, fields } => self.store_in(row, &fields).await,
            Command::Tally { row, fields } => self.tally(row, &fields).await,
            Command::Pay(row) => self.pay(row).await,
            Command::Indent(fields) => self.indent(&fields).await,
            Command::Master => self.master().await,
            Command::History(search) => self.history(search.as_deref()).await,
            Command::Stats => self.stats().await,
            Command::WhoAmI => Ok(self
                .gate
                .user()
                .map(describe_user)
                .unwrap_or_else(|| "Not logged in".to_string())),
            Command::Logout => {
                self.logout();
                Ok("Logged out".to_string())
            }
            Command::Unknown(word) => Err(CLIError::ParseError(format!(
                "Unknown command '{}'. Type 'help' for commands",
                word
            ))),
            Command::Help | Command::Quit | Command::SetFormat(_) => Ok(String::new()),
        }
    }

    /// Close overlays and the indent confirmation whose delay has passed.
    fn dismiss_expired(&mut self, now: Instant) {
        let delay = self.config.dismiss_delay();
        for list in self.lists.iter_mut() {
            if list.dismiss_expired(now, delay) {
                log::debug!("[SHELL] Overlay dismissed");
            }
        }
        if self.create_indent.reset_expired(now) {
            log::debug!("[SHELL] Indent form reset");
        }
    }

    fn current_page(&self) -> Result<PageId> {
        match self.router.render() {
            RouteView::AccessDenied => Err(CLIError::ActionFailed(ACCESS_DENIED_MESSAGE.into())),
            RouteView::Page(page) => Ok(page),
        }
    }

    fn require_page(&self, expected: PageId, command: &str) -> Result<()> {
        let page = self.current_page()?;
        if page == expected {
            return Ok(());
        }
        Err(CLIError::ActionFailed(format!(
            "'{}' works on the {} page. Use: open {}",
            command,
            expected.label(),
            expected.as_str()
        )))
    }

    async fn open_page(&mut self, page: &str) -> Result<String> {
        self.router.navigate(page.trim());

        if self.router.render() == RouteView::AccessDenied {
            let mut output = self.paint_error(ACCESS_DENIED_MESSAGE);
            if self.router.enforce() {
                output.push_str(&format!("\nReturning to {}", self.router.title()));
            }
            return Ok(output);
        }

        self.show_current(None, true).await
    }

    /// Print the landing page after login or restore.
    pub async fn open_landing_page(&mut self) {
        let page = self.router.current_page().to_string();
        match self.open_page(&page).await {
            Ok(output) => println!("{}", output),
            Err(e) => eprintln!("{}", self.paint_error(&format!("✗ {}", e))),
        }
    }

    /// Render the current page, fetching first when `refresh` is set or the
    /// page has never loaded.
    async fn show_current(&mut self, search: Option<&str>, refresh: bool) -> Result<String> {
        let page = self.current_page()?;
        let header = self.page_header();
        let (animate, threshold) = (self.animations, self.config.loading_threshold());

        let body = match page {
            PageId::Dashboard => {
                if refresh || self.dashboard.stats().is_none() {
                    with_loading(animate, threshold, "Loading dashboard...", self.dashboard.load(&self.client))
                        .await;
                }
                self.render_dashboard()?
            }
            PageId::CreateIndent => {
                if refresh || !self.create_indent.history().is_loaded() {
                    with_loading(animate, threshold, "Loading...", async {
                        if let Err(e) = self.create_indent.load_master(&self.client).await {
                            log::debug!("[SHELL] Master data not loaded: {}", e);
                        }
                        self.create_indent.load_history(&self.client).await
                    })
                    .await;
                }
                self.render_create_indent(search)?
            }
            PageId::License => {
                let user = self.gate.user().ok_or(CLIError::NotLoggedIn)?;
                license::license_text(user)
            }
            list_page => {
                if let Some(list) = self.lists.get_mut(list_page) {
                    if refresh || !list.is_loaded() {
                        with_loading(animate, threshold, "Loading...", list.refresh(&self.client, list_page))
                            .await;
                    }
                }
                self.render_list(list_page, search)?
            }
        };

        Ok(format!("{}\n{}", header, body))
    }

    fn page_header(&self) -> String {
        let title = format!("── {} ──", self.router.title());
        if self.color {
            title.bold().to_string()
        } else {
            title
        }
    }

    fn error_panel(&self, message: &str) -> String {
        format!(
            "{}\nType 'retry' to try again.",
            self.paint_error(&format!("✗ {}", message))
        )
    }

    fn paint_error(&self, message: &str) -> String {
        if self.color {
            message.red().to_string()
        } else {
            message.to_string()
        }
    }

    fn paint_success(&self, message: &str) -> String {
        if self.color {
            format!("✓ {}", message).green().to_string()
        } else {
            format!("✓ {}", message)
        }
    }

    fn render_list(&self, page: PageId, search: Option<&str>) -> Result<String> {
        let Some(list) = self.lists.get(page) else {
            return Ok(String::new());
        };
        if let Some(error) = list.error() {
            return Ok(self.error_panel(error));
        }

        let rows = list.filter(search_columns(page), search);
        let mut output = self.formatter.format_records(&rows)?;

        if page == PageId::MakePayment && self.formatter.format() == OutputFormat::Table {
            let totals = make_payment::totals(&rows, list.rows());
            output.push_str(&format!(
                "\nItems: {}  Total amount: {}  With payment link: {}",
                totals.items,
                fms_link::models::js_number(totals.amount),
                totals.with_link
            ));
        }
        Ok(output)
    }

    fn render_create_indent(&self, search: Option<&str>) -> Result<String> {
        let mut sections = Vec::new();

        if let Some(receipt) = self.create_indent.receipt() {
            sections.push(self.paint_success(&create_indent::success_message(receipt)));
        }
        match (self.create_indent.master(), self.create_indent.master_error()) {
            (_, Some(error)) => sections.push(self.paint_error(&format!("✗ {}", error))),
            (Some(master), None) => sections.push(create_indent::master_summary(master)),
            (None, None) => {}
        }

        let history = self.create_indent.history();
        match history.error() {
            Some(error) => sections.push(self.error_panel(error)),
            None => {
                let rows = create_indent::search_history(history.rows(), search);
                sections.push(self.formatter.format_records(&rows)?);
            }
        }
        Ok(sections.join("\n"))
    }

    fn render_dashboard(&self) -> Result<String> {
        if let Some(error) = self.dashboard.error() {
            return Ok(self.error_panel(error));
        }
        match self.dashboard.stats() {
            Some(stats) => self.format_stats(stats),
            None => Ok(String::new()),
        }
    }

    fn format_stats(&self, stats: &DashboardStats) -> Result<String> {
        if self.formatter.format() == OutputFormat::Json {
            return self.formatter.format_json(stats);
        }

        let mut pairs: Vec<(String, String)> = [
            ("Total Indents", stats.total_indents),
            ("Approved", stats.approved),
            ("Rejected", stats.rejected),
            ("Pending Approval", stats.pending_approval),
            ("Pending Lifting", stats.pending_lifting),
            ("Pending Store In", stats.pending_store_in),
            ("Pending Tally Entry", stats.pending_tally_entry),
            ("Completed", stats.completed),
        ]
        .into_iter()
        .map(|(label, count)| (label.to_string(), count.to_string()))
        .collect();

        for bucket in &stats.monthly {
            pairs.push((
                bucket.label.clone(),
                format!(
                    "{} indents, {} approved, {} rejected, {} completed",
                    bucket.indents, bucket.approved, bucket.rejected, bucket.completed
                ),
            ));
        }
        self.formatter.format_pairs(&pairs)
    }

    /// Make sure a list page has rows before acting on one of them.
    async fn ensure_loaded(&mut self, page: PageId) {
        let (animate, threshold) = (self.animations, self.config.loading_threshold());
        if let Some(list) = self.lists.get_mut(page) {
            if !list.is_loaded() {
                with_loading(animate, threshold, "Loading...", list.refresh(&self.client, page)).await;
            }
        }
    }

    async fn show_row(&mut self, row: u64) -> Result<String> {
        let page = self.current_page()?;

        if page == PageId::CreateIndent {
            let record = self
                .create_indent
                .history()
                .find(row)
                .ok_or_else(|| CLIError::ActionFailed(format!("Row {} is not in the history", row)))?;
            return self.formatter.format_pairs(&all_columns(record));
        }

        if self.lists.get(page).is_none() {
            return Err(CLIError::ActionFailed(format!(
                "'show' is not available on the {} page",
                page.label()
            )));
        }
        self.ensure_loaded(page).await;

        let list = self
            .lists
            .get_mut(page)
            .ok_or_else(|| CLIError::ActionFailed(format!("Row {} is not in the pending list", row)))?;
        let record = list
            .select(row)
            .ok_or_else(|| CLIError::ActionFailed(format!("Row {} is not in the pending list", row)))?;

        let pairs = if page == PageId::TallyEntry {
            tally_entry::detail_columns(record)
        } else {
            all_columns(record)
        };
        self.formatter.format_pairs(&pairs)
    }

    async fn decide(&mut self, row: u64, decision: ApprovalDecision) -> Result<String> {
        let command = decision.as_str();
        self.require_page(PageId::ApproveIndent, command)?;
        self.ensure_loaded(PageId::ApproveIndent).await;

        if self.interactive {
            if let Some(record) = self.lists.approvals.find(row) {
                let question = approve_indent::confirmation_prompt(record, decision);
                if !confirm(&question)? {
                    return Err(CLIError::Cancelled);
                }
            }
        }

        let (animate, threshold) = (self.animations, self.config.loading_threshold());
        let result = with_loading(
            animate,
            threshold,
            "Submitting...",
            approve_indent::decide(&mut self.lists.approvals, &self.client, row, decision),
        )
        .await;
        self.submission_reply(result)
    }

    async fn lift(&mut self, row: u64, fields: &FormFields) -> Result<String> {
        self.require_page(PageId::Lifting, "lift")?;
        let form = lifting::form_from_fields(fields)?;
        form.validate()?;
        self.ensure_loaded(PageId::Lifting).await;

        let (animate, threshold) = (self.animations, self.config.loading_threshold());
        let message = if form.photo_of_bill.is_some() {
            "Uploading..."
        } else {
            "Submitting..."
        };
        let result = with_loading(
            animate,
            threshold,
            message,
            lifting::submit(&mut self.lists.lifting, &self.client, row, &form),
        )
        .await;
        self.submission_reply(result)
    }

    async fn store_in(&mut self, row: u64, fields: &FormFields) -> Result<String> {
        self.require_page(PageId::StoreIn, "store-in")?;
        let form = store_in::form_from_fields(fields)?;
        form.validate()?;
        self.ensure_loaded(PageId::StoreIn).await;

        let (animate, threshold) = (self.animations, self.config.loading_threshold());
        let result = with_loading(
            animate,
            threshold,
            "Uploading...",
            store_in::submit(&mut self.lists.store_in, &self.client, row, &form),
        )
        .await;
        self.submission_reply(result)
    }

    async fn tally(&mut self, row: u64, fields: &FormFields) -> Result<String> {
        self.require_page(PageId::TallyEntry, "tally")?;
        let form = tally_entry::form_from_fields(fields)?;
        form.validate()?;
        self.ensure_loaded(PageId::TallyEntry).await;

        let (animate, threshold) = (self.animations, self.config.loading_threshold());
        let result = with_loading(
            animate,
            threshold,
            "Submitting...",
            tally_entry::submit(&mut self.lists.tally, &self.client, row, &form),
        )
        .await;
        self.submission_reply(result)
    }

    fn submission_reply(&self, result: std::result::Result<&'static str, String>) -> Result<String> {
        match result {
            Ok(message) => Ok(self.paint_success(message)),
            Err(message) => Err(CLIError::ActionFailed(message)),
        }
    }

    async fn pay(&mut self, row: u64) -> Result<String> {
        self.require_page(PageId::MakePayment, "pay")?;
        self.ensure_loaded(PageId::MakePayment).await;

        let record = self
            .lists
            .payments
            .find(row)
            .ok_or_else(|| CLIError::ActionFailed(format!("Row {} is not in the payment list", row)))?;
        make_payment::payment_link(record)
            .map(|link| format!("Payment link: {}", link))
            .map_err(|message| CLIError::ActionFailed(message.to_string()))
    }

    async fn indent(&mut self, fields: &FormFields) -> Result<String> {
        self.require_page(PageId::CreateIndent, "indent")?;
        let form = create_indent::form_from_fields(fields)?;
        form.validate()?;

        let (animate, threshold) = (self.animations, self.config.loading_threshold());
        let result = with_loading(
            animate,
            threshold,
            "Submitting...",
            self.create_indent.submit(&self.client, &form),
        )
        .await;
        match result {
            Ok(message) => Ok(self.paint_success(&message)),
            Err(message) => Err(CLIError::ActionFailed(message)),
        }
    }

    async fn master(&mut self) -> Result<String> {
        self.require_page(PageId::CreateIndent, "master")?;
        let (animate, threshold) = (self.animations, self.config.loading_threshold());
        let master = with_loading(
            animate,
            threshold,
            "Loading...",
            self.create_indent.load_master(&self.client),
        )
        .await
        .map_err(CLIError::ActionFailed)?;

        let pairs = vec![
            ("Indentor Names".to_string(), master.indentor_names.join(", ")),
            ("Group Heads".to_string(), master.group_heads.join(", ")),
            ("Product Names".to_string(), master.product_names.join(", ")),
        ];
        let summary = create_indent::master_summary(master);
        Ok(format!("{}\n{}", summary, self.formatter.format_pairs(&pairs)?))
    }

    async fn history(&mut self, search: Option<&str>) -> Result<String> {
        self.require_page(PageId::CreateIndent, "history")?;
        if !self.create_indent.history().is_loaded() {
            let (animate, threshold) = (self.animations, self.config.loading_threshold());
            with_loading(animate, threshold, "Loading...", self.create_indent.load_history(&self.client))
                .await;
        }

        let history = self.create_indent.history();
        if let Some(error) = history.error() {
            return Ok(self.error_panel(error));
        }
        let rows = create_indent::search_history(history.rows(), search);
        self.formatter.format_records(&rows)
    }

    async fn stats(&mut self) -> Result<String> {
        self.require_page(PageId::Dashboard, "stats")?;
        let (animate, threshold) = (self.animations, self.config.loading_threshold());
        with_loading(animate, threshold, "Loading dashboard...", self.dashboard.load(&self.client)).await;
        self.render_dashboard()
    }

    fn primary_prompt(&self) -> String {
        let page = if self.gate.is_logged_in() {
            self.router.current_page()
        } else {
            "login"
        };
        if self.color {
            format!("{}:{}> ", "fms".cyan().bold(), page.yellow())
        } else {
            format!("fms:{}> ", page)
        }
    }

    fn print_banner(&self) {
        let title = format!("FMS CLI v{}", crate::CLI_VERSION);
        if self.color {
            println!("{}", title.bold());
            println!("{}", format!("Endpoint: {}", self.client.base_url()).dimmed());
            println!("{}", "Type 'help' for commands, 'quit' to exit".dimmed());
        } else {
            println!("{}", title);
            println!("Endpoint: {}", self.client.base_url());
            println!("Type 'help' for commands, 'quit' to exit");
        }
    }

    /// Ask for credentials until a login succeeds or input ends.
    async fn login_prompt(&mut self, rl: &mut Editor<CLIHelper, DefaultHistory>) -> Result<()> {
        let username = rl.readline("Username: ")?;
        let password = rpassword::prompt_password("Password: ")
            .map_err(|e| CLIError::ReadlineError(e.to_string()))?;
        self.login(username.trim(), &password).await
    }

    /// Run the interactive readline loop.
    pub async fn run_interactive(&mut self) -> Result<()> {
        self.interactive = true;
        self.print_banner();

        let config = Config::builder()
            .completion_type(CompletionType::List)
            .completion_prompt_limit(100)
            .edit_mode(EditMode::Emacs)
            .auto_add_history(false)
            .build();
        let mut rl = Editor::<CLIHelper, DefaultHistory>::with_config(config)?;
        rl.set_helper(Some(CLIHelper::new(AutoCompleter::new(self.color), self.color)));

        let history = CommandHistory::new(self.config.resolved_ui().history_size);
        if let Ok(entries) = history.load() {
            for entry in entries {
                let _ = rl.add_history_entry(entry.as_str());
            }
        }

        if self.gate.is_logged_in() {
            self.open_landing_page().await;
        }

        loop {
            if !self.gate.is_logged_in() {
                println!("{}", "Sign in to continue".bold());
                match self.login_prompt(&mut rl).await {
                    Ok(()) => {
                        if let Some(user) = self.gate.user() {
                            println!("{}", format!("Welcome, {}!", user.display_name()).green());
                        }
                        self.open_landing_page().await;
                    }
                    Err(CLIError::Cancelled) => {
                        println!("\n{}", "Goodbye!".cyan());
                        break;
                    }
                    Err(e) => {
                        eprintln!("{}", self.paint_error(&format!("✗ {}", e)));
                        continue;
                    }
                }
            }

            if let Some(helper) = rl.helper_mut() {
                helper.completer.set_pages(self.router.allowed_pages().to_vec());
            }

            match rl.readline(&self.primary_prompt()) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    let _ = rl.add_history_entry(line);
                    if let Err(e) = history.append(line) {
                        log::debug!("[SHELL] History not saved: {}", e);
                    }

                    match self.execute(line).await {
                        Ok(true) => {}
                        Ok(false) => {
                            println!("{}", "Goodbye!".cyan());
                            break;
                        }
                        Err(CLIError::Cancelled) => println!("{}", "Cancelled".yellow()),
                        Err(e) => eprintln!("{}", self.paint_error(&format!("✗ {}", e))),
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("{}", "Use quit or Ctrl+D to exit".dimmed());
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("\n{}", "Goodbye!".cyan());
                    break;
                }
                Err(err) => {
                    eprintln!("{}", self.paint_error(&format!("✗ {}", err)));
                    break;
                }
            }
        }

        log::debug!("[SHELL] {} commands executed", self.commands_executed);
        Ok(())
    }
}

/// Every column of a row, the handle first.
fn all_columns(record: &WorkflowRecord) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    if let Some(row) = record.row_number {
        pairs.push(("Row".to_string(), row.to_string()));
    }
    pairs.extend(
        record
            .column_names()
            .map(|name| (name.to_string(), record.text(name))),
    );
    pairs
}

/// `[y/N]` question on the terminal.
fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N] ", question);
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

/// Create a spinner for requests that outlast the loading threshold
fn create_spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
        .template("{spinner:.cyan} {msg}")
    {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Await `fut`, showing a spinner if it takes longer than `threshold`.
async fn with_loading<F: Future>(
    enabled: bool,
    threshold: Duration,
    message: &'static str,
    fut: F,
) -> F::Output {
    if !enabled {
        return fut.await;
    }

    let spinner = Arc::new(Mutex::new(None::<ProgressBar>));
    let spinner_clone = Arc::clone(&spinner);
    let show_loading = tokio::spawn(async move {
        tokio::time::sleep(threshold).await;
        if let Ok(mut slot) = spinner_clone.lock() {
            *slot = Some(create_spinner(message));
        }
    });

    let output = fut.await;

    show_loading.abort();
    let _ = show_loading.await;
    if let Ok(mut slot) = spinner.lock() {
        if let Some(pb) = slot.take() {
            pb.finish_and_clear();
        }
    }
    output
}

/// Rustyline helper with command completion and inline hints
struct CLIHelper {
    completer: AutoCompleter,
    color: bool,
}

impl CLIHelper {
    fn new(completer: AutoCompleter, color: bool) -> Self {
        Self { completer, color }
    }
}

impl Completer for CLIHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        self.completer.complete(line, pos, ctx)
    }
}

impl Hinter for CLIHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &rustyline::Context<'_>) -> Option<Self::Hint> {
        self.completer.completion_hint(line, pos)
    }
}

impl Highlighter for CLIHelper {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        if self.color && !hint.is_empty() {
            Cow::Owned(hint.dimmed().to_string())
        } else {
            Cow::Borrowed(hint)
        }
    }
}

impl Validator for CLIHelper {}

impl Helper for CLIHelper {}
