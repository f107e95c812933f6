//! Headless Chrome rendering via chromiumoxide
//!
//! One disposable browser per invocation: launch, navigate, settle, capture
//! markup, tear down. The session is closed on every exit path.

use std::time::Duration;

use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use url::Url;

use crate::config::{ScrapeConfig, WaitPolicy};
use crate::error::ScrapeError;
use crate::extract::{FUTURE_DAY_SELECTOR, TODAY_SELECTOR};

/// Desktop UA; the site serves a challenge page to obvious automation.
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const WINDOW_WIDTH: u32 = 1366;
const WINDOW_HEIGHT: u32 = 900;

/// Primary-action controls of the consent dialogs seen on the site and its
/// ad partners. Best effort only.
const CONSENT_SELECTORS: &[&str] = &[
    "#onetrust-accept-btn-handler",
    "button.fc-cta-consent",
    ".cky-btn-accept",
    "button[mode=primary]",
];

/// Fetch the fully rendered markup for the configured forecast page.
pub async fn fetch_rendered(config: &ScrapeConfig) -> Result<String, ScrapeError> {
    Url::parse(&config.url)
        .map_err(|e| ScrapeError::render(format!("invalid target url {}: {e}", config.url)))?;

    let session = BrowserSession::launch().await?;
    let outcome = render(&session, config).await;
    session.close().await;
    outcome
}

/// A launched browser plus its CDP event handler task.
struct BrowserSession {
    browser: Browser,
    handler: tokio::task::JoinHandle<()>,
}

impl BrowserSession {
    async fn launch() -> Result<Self, ScrapeError> {
        let browser_config = BrowserConfig::builder()
            .no_sandbox()
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-setuid-sandbox")
            .arg("--no-first-run")
            .arg("--headless=new")
            .arg(format!("--window-size={WINDOW_WIDTH},{WINDOW_HEIGHT}"))
            .build()
            .map_err(|e| ScrapeError::render(format!("browser config error: {e}")))?;

        let (browser, mut handler) = Browser::launch(browser_config).await.map_err(|e| {
            ScrapeError::render(format!(
                "failed to launch Chrome (is Chrome/Chromium installed?): {e}"
            ))
        })?;

        let handler = tokio::spawn(async move { while handler.next().await.is_some() {} });

        Ok(Self { browser, handler })
    }

    async fn close(mut self) {
        let _ = self.browser.close().await;
        self.handler.abort();
    }
}

async fn render(session: &BrowserSession, config: &ScrapeConfig) -> Result<String, ScrapeError> {
    let page = session
        .browser
        .new_page("about:blank")
        .await
        .map_err(|e| ScrapeError::render(format!("failed to open page: {e}")))?;

    page.execute(SetUserAgentOverrideParams::new(USER_AGENT))
        .await
        .map_err(|e| ScrapeError::render(format!("failed to set user agent: {e}")))?;

    let nav = tokio::time::timeout(
        Duration::from_millis(config.nav_timeout_ms),
        page.goto(config.url.as_str()),
    )
    .await;
    match nav {
        Ok(Ok(_)) => {}
        Ok(Err(e)) => return Err(ScrapeError::render(format!("navigation failed: {e}"))),
        Err(_) => return Err(ScrapeError::render("navigation timeout")),
    }

    match config.wait {
        WaitPolicy::NetworkIdle => {
            if !eval_bool(&page, network_idle_script(config.content_timeout_ms)).await {
                eprintln!("  network never settled, continuing with current markup");
            }
        }
        WaitPolicy::DomSettle => {
            let _ = page.wait_for_navigation().await;
            tokio::time::sleep(Duration::from_millis(config.settle_ms)).await;
        }
    }

    if dismiss_consent_dialog(&page).await {
        eprintln!("  consent dialog dismissed");
    }

    let content_selector = format!("{TODAY_SELECTOR}, {FUTURE_DAY_SELECTOR}");
    let found = eval_bool(
        &page,
        selector_wait_script(&content_selector, config.content_timeout_ms),
    )
    .await;

    // Capture whatever is there even on timeout, it is the only diagnostic
    let html = page
        .content()
        .await
        .map_err(|e| ScrapeError::render(format!("failed to capture markup: {e}")))?;

    if !found {
        return Err(ScrapeError::render_with_preview(
            "day containers never appeared",
            &html,
        ));
    }

    Ok(html)
}

/// Click the first matching consent control, if any. Returns whether an
/// action was taken; absence of a dialog is a no-op, not an error.
async fn dismiss_consent_dialog(page: &Page) -> bool {
    let selectors = CONSENT_SELECTORS.join("', '");
    let script = format!(
        r#"(() => {{
            for (const sel of ['{selectors}']) {{
                const el = document.querySelector(sel);
                if (el) {{ el.click(); return true; }}
            }}
            return false;
        }})()"#
    );
    eval_bool(page, script).await
}

/// Resource-count heuristic: readyState complete and no new resource entries
/// for a full second. CDP has no stable network-idle surface, so this polls
/// inside the page.
fn network_idle_script(timeout_ms: u64) -> String {
    format!(
        r#"(async () => {{
            const deadline = Date.now() + {timeout_ms};
            const interval = 250;
            let last = 0;
            let stable = 0;
            try {{ last = performance.getEntriesByType('resource').length; }} catch (_) {{}}
            while (Date.now() < deadline) {{
                await new Promise(r => setTimeout(r, interval));
                let cur = last;
                try {{ cur = performance.getEntriesByType('resource').length; }} catch (_) {{}}
                if (document.readyState === 'complete' && cur === last) {{
                    stable += interval;
                    if (stable >= 1000) return true;
                }} else {{
                    stable = 0;
                }}
                last = cur;
            }}
            return false;
        }})()"#
    )
}

/// Poll until the selector matches or the budget runs out.
fn selector_wait_script(selector: &str, timeout_ms: u64) -> String {
    format!(
        r#"(async () => {{
            const deadline = Date.now() + {timeout_ms};
            while (Date.now() < deadline) {{
                if (document.querySelector('{selector}')) return true;
                await new Promise(r => setTimeout(r, 250));
            }}
            return false;
        }})()"#
    )
}

async fn eval_bool(page: &Page, script: String) -> bool {
    match page.evaluate(script).await {
        Ok(value) => value.into_value::<bool>().unwrap_or(false),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_wait_script_embeds_selector_and_budget() {
        let script = selector_wait_script(".tide-day", 5000);
        assert!(script.contains("querySelector('.tide-day')"));
        assert!(script.contains("Date.now() + 5000"));
    }

    #[test]
    fn test_consent_selectors_are_single_quote_safe() {
        // selectors are spliced into a single-quoted JS string literal
        for sel in CONSENT_SELECTORS {
            assert!(!sel.contains('\''), "{sel} would break the script");
        }
    }

    #[test]
    fn test_network_idle_script_is_bounded() {
        let script = network_idle_script(20_000);
        assert!(script.contains("Date.now() + 20000"));
    }
}
