//! Declarative endpoint catalogue.
//!
//! Every data-retrieval method is one descriptor: path, verb, audience
//! segment, which account identifier the URL takes, and the envelope key
//! holding the payload. A single executor in `client` consumes these, so
//! adding an endpoint is one constant plus one public method.

use reqwest::Method;

/// API path component selecting the account-role namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Audience {
    Students,
    Parents,
    Users,
}

impl Audience {
    pub(crate) fn segment(self) -> &'static str {
        match self {
            Audience::Students => "students",
            Audience::Parents => "parents",
            Audience::Users => "users",
        }
    }
}

/// Which account identifier is interpolated into the URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IdKind {
    /// Digits-only id, e.g. "1234" from "S1234AB".
    Numeric,
    /// The raw alphanumeric identifier.
    Ident,
}

pub(crate) struct Endpoint {
    /// Path below `{base}/{audience}/{id}`. Parameterized endpoints format
    /// their own path at call time and this serves as documentation.
    pub path: &'static str,
    pub method: Method,
    pub audience: Audience,
    pub id: IdKind,
    /// Envelope key holding the payload; `None` returns the whole envelope.
    pub key: Option<&'static str>,
}

impl Endpoint {
    const fn get(path: &'static str, key: Option<&'static str>) -> Self {
        Self {
            path,
            method: Method::GET,
            audience: Audience::Students,
            id: IdKind::Numeric,
            key,
        }
    }

    const fn post(path: &'static str, key: Option<&'static str>) -> Self {
        Self {
            path,
            method: Method::POST,
            audience: Audience::Students,
            id: IdKind::Numeric,
            key,
        }
    }

    const fn parents(path: &'static str, key: Option<&'static str>) -> Self {
        Self {
            path,
            method: Method::GET,
            audience: Audience::Parents,
            id: IdKind::Ident,
            key,
        }
    }

    const fn users(method: Method, path: &'static str, key: Option<&'static str>) -> Self {
        Self {
            path,
            method,
            audience: Audience::Users,
            id: IdKind::Ident,
            key,
        }
    }
}

pub(crate) const GRADES: Endpoint = Endpoint::get("/grades", Some("grades"));
pub(crate) const ABSENCES: Endpoint = Endpoint::get("/absences/details", Some("events"));
pub(crate) const AGENDA: Endpoint = Endpoint::get("/agenda", Some("agenda"));
pub(crate) const LESSONS_TODAY: Endpoint = Endpoint::get("/lessons/today", Some("lessons"));
pub(crate) const LESSONS: Endpoint = Endpoint::get("/lessons", Some("lessons"));
pub(crate) const CALENDAR: Endpoint = Endpoint::get("/calendar/all", Some("calendar"));
pub(crate) const PERIODS: Endpoint = Endpoint::get("/periods", Some("periods"));
pub(crate) const SUBJECTS: Endpoint = Endpoint::get("/subjects", Some("subjects"));
pub(crate) const NOTES: Endpoint = Endpoint::get("/notes/all", None);
// the API really does spell the envelope key this way
pub(crate) const DIDACTICS: Endpoint = Endpoint::get("/didactics", Some("didacticts"));
pub(crate) const NOTICEBOARD: Endpoint = Endpoint::get("/noticeboard", Some("items"));
pub(crate) const CARD: Endpoint = Endpoint::get("/card", Some("card"));
pub(crate) const DOCUMENTS: Endpoint = Endpoint::post("/documents", Some("documents"));
pub(crate) const CHECK_DOCUMENT: Endpoint = Endpoint::post("/documents/check", Some("document"));
pub(crate) const READ_DOCUMENT: Endpoint = Endpoint::post("/documents/read", None);
pub(crate) const READ_NOTICE: Endpoint = Endpoint::post("/noticeboard/read", None);
pub(crate) const TALKS: Endpoint = Endpoint::parents("/talks/teachersframes", Some("teachers"));
pub(crate) const TALK_OPTIONS: Endpoint = Endpoint::parents("/talks/options", Some("options"));
pub(crate) const TERMS_AGREEMENT: Endpoint =
    Endpoint::users(Method::GET, "/terms-agreement", Some("agreement"));
pub(crate) const SET_TERMS_AGREEMENT: Endpoint =
    Endpoint::users(Method::POST, "/terms-agreement", Some("agreement"));
