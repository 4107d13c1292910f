//! HTML parsing for the legacy dashboard.
//!
//! Pure functions from raw HTML text to structured payloads; no network,
//! no state. Every extraction is scoped to the narrowest stable selector so
//! markup drift elsewhere on the page does not break it. Fields split into
//! mandatory (balance, traffic, device containers, CSRF token - missing
//! means the service changed shape incompatibly, so a parse error) and
//! optional (referral link - recorded as absent).

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use pawns_core::{DashboardSnapshot, Device, Pagination};

use crate::error::ClientError;

// Stable selectors observed on the rendered dashboard.
const LOGIN_TOKEN_SELECTOR: &str = r#"input[type="hidden"][name="_token"]"#;
const PAYMENT_CARD_SELECTOR: &str = "section.ipr-card.payment_card";
const BALANCE_SELECTOR: &str = ".payment_card__amount";
const TRAFFIC_SELECTOR: &str = ".payment_card__traffic";
const DEVICES_SECTION_SELECTOR: &str = "section.active_devices_card";
const DEVICES_LIST_SELECTOR: &str = "ul.active_devices__list";
const DEVICE_ITEM_SELECTOR: &str = "li.active_devices__item.active_devices__list-item";
const DEVICE_PLATFORM_SELECTOR: &str = "img.active_devices__platform";
const DEVICE_FLAG_SELECTOR: &str = "i.active_devices__flag-icon";
const REFERRAL_LINK_SELECTOR: &str = "input.aff_card__text-field.js-ref-url-aff-card";
const PAGE_LIST_SELECTOR: &str = "ul.pagination li";
const ACTIVE_PAGE_SELECTOR: &str = "ul.pagination li.active";

fn selector(css: &'static str) -> Result<Selector, ClientError> {
    Selector::parse(css).map_err(|e| ClientError::Parse(format!("bad selector {css}: {e}")))
}

fn parse_error(what: &str) -> ClientError {
    ClientError::Parse(format!("expected page structure missing: {what}"))
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Extracts the hidden CSRF token from the login page.
///
/// The token is mandatory: without it the login form cannot be submitted.
pub fn parse_login_token(html: &str) -> Result<String, ClientError> {
    let document = Html::parse_document(html);
    let token = document
        .select(&selector(LOGIN_TOKEN_SELECTOR)?)
        .next()
        .and_then(|el| el.value().attr("value"))
        .ok_or_else(|| parse_error("login CSRF token"))?;
    Ok(token.to_string())
}

/// Extracts the structured dashboard contents from the home page.
///
/// Balance, traffic, and the device containers are mandatory; the referral
/// link is optional and recorded as `None` when absent.
pub fn parse_dashboard(html: &str) -> Result<DashboardSnapshot, ClientError> {
    debug!(len = html.len(), "Parsing dashboard page");
    let document = Html::parse_document(html);

    let payment_card = document
        .select(&selector(PAYMENT_CARD_SELECTOR)?)
        .next()
        .ok_or_else(|| parse_error("payment card section"))?;

    let balance = payment_card
        .select(&selector(BALANCE_SELECTOR)?)
        .next()
        .map(element_text)
        .ok_or_else(|| parse_error("balance amount"))?;

    let traffic = payment_card
        .select(&selector(TRAFFIC_SELECTOR)?)
        .next()
        .map(element_text)
        .ok_or_else(|| parse_error("traffic counter"))?;

    let devices = parse_device_list(html)?;

    let referral_link = document
        .select(&selector(REFERRAL_LINK_SELECTOR)?)
        .next()
        .and_then(|el| el.value().attr("value"))
        .map(String::from);

    Ok(DashboardSnapshot {
        balance,
        traffic,
        devices,
        referral_link,
    })
}

/// Extracts the device list from a page.
///
/// The device section and list containers are mandatory; individual items
/// missing their IP or attribute markup are also treated as parse errors,
/// since a half-rendered device row indicates incompatible drift.
pub fn parse_device_list(html: &str) -> Result<Vec<Device>, ClientError> {
    let document = Html::parse_document(html);

    let section = document
        .select(&selector(DEVICES_SECTION_SELECTOR)?)
        .next()
        .ok_or_else(|| parse_error("devices section"))?;

    let list = section
        .select(&selector(DEVICES_LIST_SELECTOR)?)
        .next()
        .ok_or_else(|| parse_error("devices list"))?;

    let item_selector = selector(DEVICE_ITEM_SELECTOR)?;
    let ip_selector = selector("div")?;
    let platform_selector = selector(DEVICE_PLATFORM_SELECTOR)?;
    let flag_selector = selector(DEVICE_FLAG_SELECTOR)?;

    let mut devices = Vec::new();
    for item in list.select(&item_selector) {
        let ip = item
            .select(&ip_selector)
            .next()
            .map(element_text)
            .ok_or_else(|| parse_error("device ip"))?;

        let platform = item
            .select(&platform_selector)
            .next()
            .and_then(|el| el.value().attr("title"))
            .ok_or_else(|| parse_error("device platform"))?;

        let country = item
            .select(&flag_selector)
            .next()
            .and_then(|el| el.value().attr("title"))
            .ok_or_else(|| parse_error("device country"))?;

        devices.push(Device::from_raw(&ip, platform, country));
    }

    Ok(devices)
}

/// Derives pagination state from a page-number list.
///
/// No page list at all is the single-page state: every field comes back
/// absent and no error is raised. A page list that is present but does not
/// yield numeric first/last/active entries is incompatible drift.
pub fn parse_pagination(html: &str) -> Result<Pagination, ClientError> {
    let document = Html::parse_document(html);

    let numbers: Vec<u32> = document
        .select(&selector(PAGE_LIST_SELECTOR)?)
        .filter_map(|li| element_text(li).parse().ok())
        .collect();

    if numbers.is_empty() {
        return Ok(Pagination::empty());
    }

    let first = *numbers.first().ok_or_else(|| parse_error("first page number"))?;
    let last = *numbers.last().ok_or_else(|| parse_error("last page number"))?;

    let active: u32 = document
        .select(&selector(ACTIVE_PAGE_SELECTOR)?)
        .next()
        .map(element_text)
        .and_then(|text| text.parse().ok())
        .ok_or_else(|| parse_error("active page number"))?;

    Ok(Pagination::derive(active, first, last))
}
