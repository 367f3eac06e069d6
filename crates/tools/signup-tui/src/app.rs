//! Terminal setup and the page's event loop.

use crate::config::AppConfig;
use crate::page::{PageCommand, SignupPage};
use crate::ui;
use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::Backend, backend::CrosstermBackend};
use signup_client::{SignupClient, StorageTokenProvider};
use signup_core::{ActionDispatcher, ActionReports, SignupForm};
use std::{
    io,
    sync::Arc,
    time::Duration,
};
use tracing::{debug, info};

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Builds the client and dispatcher, then runs the page until the user quits.
pub async fn run(config: &AppConfig) -> Result<()> {
    let storage = config.local_storage()?;
    let token_provider = StorageTokenProvider::new(storage, config.storage.token_key.clone());
    let client = SignupClient::new(config.client_config(), Arc::new(token_provider))
        .context("Failed to create signup client")?;
    info!(api_root = client.api_root(), "Signup page starting");

    let (mut dispatcher, mut reports) = ActionDispatcher::new(Arc::new(client));
    let mut page = SignupPage::new(SignupForm::new(
        config.validation_rules(),
        config.validation.mode,
    ));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.show_cursor()?;

    let res = run_page(&mut terminal, &mut page, &mut dispatcher, &mut reports).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    dispatcher.cancel_all();
    info!("Signup page closed");
    res
}

async fn run_page<B>(
    terminal: &mut Terminal<B>,
    page: &mut SignupPage,
    dispatcher: &mut ActionDispatcher,
    reports: &mut ActionReports,
) -> Result<()>
where
    B: Backend,
{
    loop {
        refresh(terminal, page, reports)?;

        if !event::poll(POLL_INTERVAL)? {
            // Give spawned actions a chance to run between polls.
            tokio::task::yield_now().await;
            continue;
        }

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match page.handle_key(key) {
            PageCommand::None => {}
            PageCommand::Dispatch(request) => {
                dispatcher.dispatch(request);
            }
            PageCommand::Quit => return Ok(()),
        }
    }
}

/// Folds finished actions into the page and redraws it.
fn refresh<B: Backend>(
    terminal: &mut Terminal<B>,
    page: &mut SignupPage,
    reports: &mut ActionReports,
) -> Result<()> {
    while let Some(report) = reports.try_recv() {
        debug!(kind = ?report.kind, generation = report.generation, "Action finished");
        page.apply_report(report);
    }
    terminal.draw(|f| ui::draw(f, page))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use signup_client::{ClientConfig, NoToken};
    use signup_core::ActionRequest;

    #[tokio::test]
    async fn test_refresh_applies_reports_and_draws() {
        let config = ClientConfig::builder().base_url("http://localhost:8080").build();
        let client = SignupClient::new(config, Arc::new(NoToken)).unwrap();
        let (mut dispatcher, mut reports) = ActionDispatcher::new(Arc::new(client));
        let mut page = SignupPage::new(SignupForm::default());
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();

        // an empty email is answered locally, without touching the network
        dispatcher.dispatch(ActionRequest::SendEmailCode {
            email: String::new(),
        });
        while dispatcher.in_flight(signup_core::ActionKind::SendEmailCode) {
            tokio::task::yield_now().await;
        }

        refresh(&mut terminal, &mut page, &mut reports).unwrap();
        assert_eq!(page.alert(), Some("이메일을 입력해 주세요."));

        let screen: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .filter(|symbol| !symbol.trim().is_empty())
            .collect();
        assert!(screen.contains("알림"));
    }
}
