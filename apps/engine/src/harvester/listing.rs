//! Listing-page parser.
//!
//! A job card is any element carrying `data-job-id` or `data-id`; when the
//! attribute is missing the id is taken from the card's link
//! (`.../oferta/20931845-...`). Fields missing from the markup are left
//! empty here and rejected by the validator.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::cv::contact::{EMAIL_RE, PHONE_RE};
use crate::cv::skills::extract_skills;
use crate::harvester::urls::absolutize;
use crate::harvester::JobRecord;
use crate::models::job::{JobType, WorkMode};
use crate::normalize::{contains_phrase, normalize};

/// Skills inferred per posting.
const MAX_JOB_SKILLS: usize = 30;

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector")
}

static CARD: Lazy<Selector> = Lazy::new(|| selector("[data-job-id], [data-id]"));
static TITLE: Lazy<Selector> =
    Lazy::new(|| selector("[data-title], .job-title, h1, h2, h3"));
static COMPANY: Lazy<Selector> =
    Lazy::new(|| selector("[data-company], .company, .job-company"));
static LOCATION: Lazy<Selector> =
    Lazy::new(|| selector("[data-location], .location, .job-location"));
static DESCRIPTION: Lazy<Selector> =
    Lazy::new(|| selector("[data-description], .description, .job-description"));
static LINK: Lazy<Selector> = Lazy::new(|| selector("a[href]"));
static TIME: Lazy<Selector> = Lazy::new(|| selector("time[datetime]"));
/// Detail-page roots, most specific first.
static DETAIL_ROOTS: Lazy<Vec<Selector>> = Lazy::new(|| {
    ["[data-job-id], [data-id]", "article", "main", "body"]
        .into_iter()
        .map(selector)
        .collect()
});

static ID_IN_HREF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:/|-)(\d{5,})(?:[-/?#]|$)").expect("job id regex"));

static SALARY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\$\s*([\d,]+)(?:\.\d{1,2})?\s*(?:a|-|–|—|to|hasta)\s*\$?\s*([\d,]+)")
        .expect("salary regex")
});

fn text_of(el: ElementRef<'_>) -> String {
    el.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn first_text(card: ElementRef<'_>, sel: &Selector) -> String {
    card.select(sel)
        .map(text_of)
        .find(|t| !t.is_empty())
        .unwrap_or_default()
}

pub fn id_from_href(href: &str) -> Option<String> {
    ID_IN_HREF.captures(href).map(|c| c[1].to_string())
}

/// `(min, max)` from `$50,000 a $100,000` style ranges; both ends must parse.
pub fn parse_salary(text: &str) -> (Option<i64>, Option<i64>) {
    let parse = |raw: &str| raw.replace(',', "").parse::<i64>().ok();
    SALARY_RE
        .captures(text)
        .and_then(|c| Some((parse(&c[1])?, parse(&c[2])?)))
        .map_or((None, None), |(lo, hi)| (Some(lo), Some(hi)))
}

/// Hybrid wins over remote when both are mentioned.
pub fn detect_work_mode(normalized: &str) -> WorkMode {
    let any = |words: &[&str]| words.iter().any(|w| contains_phrase(normalized, w));
    if any(&["hibrido", "hybrid", "modalidad mixta"]) {
        WorkMode::Hybrid
    } else if any(&["remoto", "remote", "home office", "teletrabajo", "trabajo desde casa"]) {
        WorkMode::Remote
    } else {
        WorkMode::InPerson
    }
}

pub fn detect_job_type(normalized: &str) -> JobType {
    let any = |words: &[&str]| words.iter().any(|w| contains_phrase(normalized, w));
    if any(&["freelance", "independiente", "por honorarios"]) {
        JobType::Freelance
    } else if any(&["medio tiempo", "part time", "tiempo parcial"]) {
        JobType::PartTime
    } else if any(&["temporal", "temporary", "por proyecto", "eventual"]) {
        JobType::Temporary
    } else {
        JobType::FullTime
    }
}

fn published_at(card: ElementRef<'_>, harvested_at: DateTime<Utc>) -> DateTime<Utc> {
    card.select(&TIME)
        .filter_map(|t| t.value().attr("datetime"))
        .find_map(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(harvested_at)
}

fn record_from_element(
    card: ElementRef<'_>,
    base_url: &str,
    fallback_id: Option<String>,
    harvested_at: DateTime<Utc>,
) -> JobRecord {
    let href = card
        .select(&LINK)
        .filter_map(|a| a.value().attr("href"))
        .next()
        .map(str::to_string);

    let external_job_id = card
        .value()
        .attr("data-job-id")
        .or_else(|| card.value().attr("data-id"))
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .or(fallback_id)
        .or_else(|| href.as_deref().and_then(id_from_href))
        .unwrap_or_default();

    let body = text_of(card);
    let description = {
        let explicit = first_text(card, &DESCRIPTION);
        if explicit.is_empty() {
            body.clone()
        } else {
            explicit
        }
    };
    let normalized = normalize(&body);
    let (salary_min, salary_max) = parse_salary(&body);

    JobRecord {
        external_job_id,
        title: first_text(card, &TITLE),
        company: first_text(card, &COMPANY),
        location: first_text(card, &LOCATION),
        url: href.map(|h| absolutize(base_url, &h)),
        work_mode: detect_work_mode(&normalized),
        job_type: detect_job_type(&normalized),
        skills: extract_skills(&normalized, MAX_JOB_SKILLS),
        salary_min,
        salary_max,
        contact_email: EMAIL_RE.find(&body).map(|m| m.as_str().to_string()),
        contact_phone: PHONE_RE.find(&body).map(|m| m.as_str().trim().to_string()),
        published_at: published_at(card, harvested_at),
        description,
    }
}

/// Every job card on a listing page, in page order.
pub fn parse_listing(html: &str, base_url: &str, harvested_at: DateTime<Utc>) -> Vec<JobRecord> {
    let document = Html::parse_document(html);
    document
        .select(&CARD)
        // a card nested in another card belongs to its parent
        .filter(|card| {
            !card
                .ancestors()
                .filter_map(ElementRef::wrap)
                .any(|a| CARD.matches(&a))
        })
        .map(|card| record_from_element(card, base_url, None, harvested_at))
        .collect()
}

/// A single job detail page. Without an id attribute the id comes from `url`.
pub fn parse_detail(
    html: &str,
    url: &str,
    base_url: &str,
    harvested_at: DateTime<Utc>,
) -> Option<JobRecord> {
    let document = Html::parse_document(html);
    let root = DETAIL_ROOTS
        .iter()
        .find_map(|sel| document.select(sel).next())?;
    let mut record = record_from_element(root, base_url, id_from_href(url), harvested_at);
    record.url = Some(url.to_string());
    Some(record)
}
