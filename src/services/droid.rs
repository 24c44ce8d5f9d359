use std::{fmt::Debug, time::Duration};

use async_trait::async_trait;
use thirtyfour::{
    error::WebDriverError, By, ChromiumLikeCapabilities, DesiredCapabilities, WebDriver,
    WindowHandle,
};

use super::{FetchError, PageRenderer};

impl From<WebDriverError> for FetchError {
    fn from(value: WebDriverError) -> Self {
        FetchError::Navigation(value.to_string())
    }
}

/// Window operations a browser session needs to render one url per tab.
#[async_trait]
pub trait TabSession: Send + Sync {
    type Handle: Clone + Debug + Send + Sync;

    async fn current_window(&self) -> Result<Self::Handle, FetchError>;
    async fn windows(&self) -> Result<Vec<Self::Handle>, FetchError>;
    async fn open_tab(&self) -> Result<Self::Handle, FetchError>;
    async fn switch_to(&self, handle: Self::Handle) -> Result<(), FetchError>;
    async fn close_current(&self) -> Result<(), FetchError>;
    /// Navigates the current window and returns its body text.
    async fn read_page(&self, url: &str, timeout: Duration) -> Result<String, FetchError>;
}

/// Opens a tab, reads `url` in it and closes the tab again. Once the tab
/// exists it is released whatever the outcome of the read.
pub async fn render_in_tab<S>(
    session: &S,
    url: &str,
    timeout: Duration,
) -> Result<String, FetchError>
where
    S: TabSession + ?Sized,
{
    let home = session.current_window().await?;
    let tab = session.open_tab().await?;

    let text = match session.switch_to(tab.clone()).await {
        Ok(()) => match tokio::time::timeout(timeout, session.read_page(url, timeout)).await {
            Ok(text) => text,
            Err(_) => Err(FetchError::Timeout(timeout)),
        },
        Err(e) => Err(e),
    };

    release_tab(session, tab, home, url).await;

    text
}

async fn release_tab<S>(session: &S, tab: S::Handle, home: S::Handle, url: &str)
where
    S: TabSession + ?Sized,
{
    let closed = match session.switch_to(tab.clone()).await {
        Ok(()) => session.close_current().await,
        Err(e) => Err(e),
    };
    if let Err(e) = closed {
        log::error!("Failed to close tab {:?} used for {}: {:?}", tab, url, e);
    }

    if let Err(e) = session.switch_to(home.clone()).await {
        log::error!("Lost home window {:?}: {:?}", home, e);
        recover_window(session).await;
    }
}

async fn recover_window<S>(session: &S)
where
    S: TabSession + ?Sized,
{
    let fallback = match session.windows().await {
        Ok(handles) => handles.into_iter().next(),
        Err(e) => {
            log::error!("Could not list browser windows: {:?}", e);
            return;
        }
    };

    match fallback {
        Some(handle) => {
            log::warn!("Continuing in window {:?}", handle);
            if let Err(e) = session.switch_to(handle).await {
                log::error!("Could not switch to any browser window: {:?}", e);
            }
        }
        None => log::error!("No browser window left open"),
    }
}

/// Chrome session driven over WebDriver. Every render gets a fresh tab.
pub struct Droid {
    pub driver: WebDriver,
}

impl Droid {
    pub async fn new(webdriver_url: &str, headless: bool) -> Result<Self, WebDriverError> {
        let mut caps = DesiredCapabilities::chrome();
        if headless {
            caps.set_headless()?;
        }

        let driver = WebDriver::new(webdriver_url, caps).await?;

        Ok(Droid { driver })
    }

    pub async fn shutdown(self) -> Result<(), WebDriverError> {
        self.driver.quit().await
    }
}

#[async_trait]
impl TabSession for Droid {
    type Handle = WindowHandle;

    async fn current_window(&self) -> Result<WindowHandle, FetchError> {
        Ok(self.driver.window().await?)
    }

    async fn windows(&self) -> Result<Vec<WindowHandle>, FetchError> {
        Ok(self.driver.windows().await?)
    }

    async fn open_tab(&self) -> Result<WindowHandle, FetchError> {
        Ok(self.driver.new_tab().await?)
    }

    async fn switch_to(&self, handle: WindowHandle) -> Result<(), FetchError> {
        Ok(self.driver.switch_to_window(handle).await?)
    }

    async fn close_current(&self) -> Result<(), FetchError> {
        Ok(self.driver.close_window().await?)
    }

    async fn read_page(&self, url: &str, timeout: Duration) -> Result<String, FetchError> {
        self.driver.set_page_load_timeout(timeout).await?;
        self.driver.goto(url).await?;

        Ok(self.driver.find(By::Tag("body")).await?.text().await?)
    }
}

#[async_trait]
impl PageRenderer for Droid {
    async fn render(&self, url: &str, timeout: Duration) -> Result<String, FetchError> {
        render_in_tab(self, url, timeout).await
    }
}
