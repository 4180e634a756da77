//! Endpoint catalog for the PreviewMyEmail API.
//!
//! # Design
//! Each method maps its typed arguments onto the exact, case-sensitive
//! parameter names the service expects and delegates to `RequestDispatcher`.
//! Absent optional arguments are never inserted. All endpoints are POST; the
//! only raw-text endpoint is `CreateEmailAnalyticsCode`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::dispatcher::RequestDispatcher;
use crate::params::ParameterSet;
use crate::transport::{Transport, UreqTransport};
use crate::types::{Credential, Decode, FeedOptions, Outcome, Payload};

/// Synchronous client for the PreviewMyEmail API.
#[derive(Debug, Clone)]
pub struct PreviewClient<T = UreqTransport> {
    dispatcher: RequestDispatcher<T>,
}

impl PreviewClient<UreqTransport> {
    /// Client for the production service with default timeouts.
    pub fn new(apikey: &str) -> Self {
        Self::with_config(apikey, ClientConfig::default())
    }

    pub fn with_config(apikey: &str, config: ClientConfig) -> Self {
        Self::with_transport(apikey, config, UreqTransport::new())
    }
}

impl<T: Transport> PreviewClient<T> {
    pub fn with_transport(apikey: &str, config: ClientConfig, transport: T) -> Self {
        Self {
            dispatcher: RequestDispatcher::new(Credential::new(apikey), config, transport),
        }
    }

    /// The underlying dispatcher, for service paths this catalog does not wrap.
    pub fn dispatcher(&self) -> &RequestDispatcher<T> {
        &self.dispatcher
    }

    fn post_json(&self, path: &str, params: ParameterSet) -> Outcome<Value> {
        self.dispatcher
            .dispatch_post(path, params, Decode::Json)
            .and_then(Payload::into_json)
    }

    /// Email clients available for design testing.
    pub fn retrieve_email_clients(&self) -> Outcome<Value> {
        self.post_json("RetrieveEmailClients", ParameterSet::new())
    }

    /// Submit an email for rendering. `email_body` is sent base64-encoded.
    /// Without `target_email_apps` the service renders every client.
    pub fn create_preview(
        &self,
        email_body: impl AsRef<[u8]>,
        email_subject: &str,
        target_email_apps: Option<&[&str]>,
    ) -> Outcome<Value> {
        let params = ParameterSet::new()
            .with("emailbody", STANDARD.encode(email_body))
            .with("emailsubject", email_subject)
            .with_opt("targetemailapps", target_email_apps);
        self.post_json("CreatePreview", params)
    }

    pub fn fetch_preview(&self, job: &str) -> Outcome<Value> {
        self.post_json("FetchPreview", ParameterSet::new().with("job", job))
    }

    /// Previews requested so far. An empty history comes back from the
    /// service as JSON `null` and is returned as an empty array.
    pub fn get_preview_list(&self) -> Outcome<Value> {
        self.post_json("GetPreviewList", ParameterSet::new())
            .map(|value| match value {
                Value::Null => Value::Array(Vec::new()),
                other => other,
            })
    }

    pub fn system_status(&self) -> Outcome<Value> {
        self.post_json("SystemStatus", ParameterSet::new())
    }

    pub fn delete_preview(&self, job: &str) -> Outcome<Value> {
        self.post_json("DeletePreview", ParameterSet::new().with("job", job))
    }

    /// Re-run a single client of an existing preview job.
    pub fn retry_email_client(&self, job: &str, client_code: &str) -> Outcome<Value> {
        let params = ParameterSet::new()
            .with("job", job)
            .with("clientcode", client_code);
        self.post_json("RetryEmailClient", params)
    }

    /// Tracking snippet for `tag`, returned verbatim.
    pub fn create_email_analytics_code(&self, tag: &str) -> Outcome<String> {
        self.dispatcher
            .dispatch_post(
                "CreateEmailAnalyticsCode",
                ParameterSet::new().with("tag", tag),
                Decode::Text,
            )
            .and_then(Payload::into_text)
    }

    pub fn get_email_analytics_counts(&self, tag: &str) -> Outcome<Value> {
        self.post_json("GetEmailAnalyticsCounts", ParameterSet::new().with("tag", tag))
    }

    pub fn get_email_analytics_top_clients(&self, tag: &str) -> Outcome<Value> {
        self.post_json("GetEmailAnalyticsTopClients", ParameterSet::new().with("tag", tag))
    }

    pub fn get_email_analytics_top_locations(&self, tag: &str) -> Outcome<Value> {
        self.post_json("GetEmailAnalyticsTopLocations", ParameterSet::new().with("tag", tag))
    }

    pub fn get_email_analytics_feed(&self, tag: &str, options: &FeedOptions) -> Outcome<Value> {
        let params = ParameterSet::new()
            .with("tag", tag)
            .with_opt("get", options.get.as_deref())
            .with_opt("timestamp", options.timestamp)
            .with_opt("limit", options.limit);
        self.post_json("GetEmailAnalyticsFeed", params)
    }

    /// Request a thumbnail rendering of `content`.
    pub fn new_thumbnail(&self, content_type: &str, content: &str) -> Outcome<Value> {
        let params = ParameterSet::new()
            .with("ContentType", content_type)
            .with("Content", content);
        self.post_json("NewThumbnail", params)
    }

    pub fn get_thumbnail(&self, request_id: &str) -> Outcome<Value> {
        self.post_json("GetThumbnail", ParameterSet::new().with("RequestID", request_id))
    }

    pub fn get_inbox_monitoring_results(&self) -> Outcome<Value> {
        self.post_json("GetInboxMonitoringResults", ParameterSet::new())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use serde_json::json;

    use super::*;
    use crate::error::TransportError;
    use crate::http::{HttpMethod, HttpRequest, HttpResponse};

    type Recorded = Rc<RefCell<Vec<HttpRequest>>>;

    fn client(
        status: u16,
        body: &'static str,
    ) -> (
        PreviewClient<impl Fn(&HttpRequest) -> Result<HttpResponse, TransportError>>,
        Recorded,
    ) {
        let recorded: Recorded = Rc::default();
        let sink = Rc::clone(&recorded);
        let transport = move |req: &HttpRequest| -> Result<HttpResponse, TransportError> {
            sink.borrow_mut().push(req.clone());
            Ok(HttpResponse::new(status, body))
        };
        let client = PreviewClient::with_transport("test-key", ClientConfig::default(), transport);
        (client, recorded)
    }

    fn last(recorded: &Recorded) -> HttpRequest {
        recorded.borrow().last().cloned().expect("no request recorded")
    }

    #[test]
    fn every_endpoint_posts_with_apikey() {
        let (c, recorded) = client(200, "{}");
        let _ = c.retrieve_email_clients();
        let _ = c.create_preview("<p>Hi</p>", "Hello", None);
        let _ = c.fetch_preview("job-1");
        let _ = c.get_preview_list();
        let _ = c.system_status();
        let _ = c.delete_preview("job-1");
        let _ = c.retry_email_client("job-1", "OL2016");
        let _ = c.create_email_analytics_code("news");
        let _ = c.get_email_analytics_counts("news");
        let _ = c.get_email_analytics_top_clients("news");
        let _ = c.get_email_analytics_top_locations("news");
        let _ = c.get_email_analytics_feed("news", &FeedOptions::new());
        let _ = c.new_thumbnail("html", "<p>Hi</p>");
        let _ = c.get_thumbnail("req-1");
        let _ = c.get_inbox_monitoring_results();

        let requests = recorded.borrow();
        let paths: Vec<&str> = requests
            .iter()
            .map(|r| r.url.trim_start_matches("https://previewmyemail.com/api/"))
            .collect();
        assert_eq!(
            paths,
            vec![
                "RetrieveEmailClients",
                "CreatePreview",
                "FetchPreview",
                "GetPreviewList",
                "SystemStatus",
                "DeletePreview",
                "RetryEmailClient",
                "CreateEmailAnalyticsCode",
                "GetEmailAnalyticsCounts",
                "GetEmailAnalyticsTopClients",
                "GetEmailAnalyticsTopLocations",
                "GetEmailAnalyticsFeed",
                "NewThumbnail",
                "GetThumbnail",
                "GetInboxMonitoringResults",
            ]
        );
        for req in requests.iter() {
            assert_eq!(req.method, HttpMethod::Post, "{}", req.url);
            assert_eq!(req.param("apikey"), Some("test-key"), "{}", req.url);
        }
    }

    #[test]
    fn create_preview_base64_encodes_body() {
        let (c, recorded) = client(200, r#"{"jobid":"j1"}"#);
        let body = "<html><body>Caf\u{e9} &amp; \u{1f4e7}</body></html>";
        let outcome = c.create_preview(body, "Subject line", None);
        assert_eq!(outcome, Outcome::Success(json!({"jobid": "j1"})));

        let req = last(&recorded);
        assert_eq!(req.param_names(), vec!["emailbody", "emailsubject", "apikey"]);
        let encoded = req.param("emailbody").unwrap();
        assert_eq!(STANDARD.decode(encoded).unwrap(), body.as_bytes());
        assert_eq!(req.param("emailsubject"), Some("Subject line"));
    }

    #[test]
    fn create_preview_accepts_binary_body() {
        let (c, recorded) = client(200, "{}");
        let bytes = [0u8, 159, 146, 150, 255];
        let _ = c.create_preview(bytes, "bin", None);
        let encoded = last(&recorded).param("emailbody").unwrap().to_string();
        assert_eq!(STANDARD.decode(encoded).unwrap(), bytes);
    }

    #[test]
    fn create_preview_sends_target_apps_as_list() {
        let (c, recorded) = client(200, "{}");
        let _ = c.create_preview("<p>Hi</p>", "Hello", Some(&["OL2016", "GMAILW"][..]));
        let req = last(&recorded);
        assert_eq!(
            req.param_names(),
            vec![
                "emailbody",
                "emailsubject",
                "targetemailapps[0]",
                "targetemailapps[1]",
                "apikey"
            ]
        );
        assert_eq!(req.param("targetemailapps[1]"), Some("GMAILW"));
    }

    #[test]
    fn preview_list_null_becomes_empty_array() {
        let (c, _) = client(200, "null");
        assert_eq!(c.get_preview_list(), Outcome::Success(json!([])));
    }

    #[test]
    fn preview_list_passes_entries_through() {
        let (c, _) = client(200, r#"[{"jobid":"a"}]"#);
        assert_eq!(c.get_preview_list(), Outcome::Success(json!([{"jobid": "a"}])));
    }

    #[test]
    fn preview_list_failure_stays_failure() {
        let (c, _) = client(500, "null");
        assert_eq!(c.get_preview_list(), Outcome::Failure);
    }

    #[test]
    fn feed_with_only_tag_sends_tag_and_apikey() {
        let (c, recorded) = client(200, "[]");
        let _ = c.get_email_analytics_feed("news", &FeedOptions::new());
        let req = last(&recorded);
        assert_eq!(req.param_names(), vec!["tag", "apikey"]);
    }

    #[test]
    fn feed_sends_present_options_only() {
        let (c, recorded) = client(200, "[]");
        let _ = c.get_email_analytics_feed("news", &FeedOptions::new().timestamp(1700000000).limit(25));
        let req = last(&recorded);
        assert_eq!(req.param_names(), vec!["tag", "timestamp", "limit", "apikey"]);
        assert_eq!(req.param("timestamp"), Some("1700000000"));
        assert_eq!(req.param("limit"), Some("25"));

        let _ = c.get_email_analytics_feed("news", &FeedOptions::new().get("opens"));
        assert_eq!(last(&recorded).param_names(), vec!["tag", "get", "apikey"]);
    }

    #[test]
    fn analytics_code_is_raw_while_counts_parse_json() {
        let (c, _) = client(200, "<img src=\"https://previewmyemail.com/t/news.gif\">");
        assert_eq!(
            c.create_email_analytics_code("news"),
            Outcome::Success("<img src=\"https://previewmyemail.com/t/news.gif\">".to_string())
        );
        assert_eq!(c.get_email_analytics_counts("news"), Outcome::Failure);
    }

    #[test]
    fn retry_sends_job_and_clientcode() {
        let (c, recorded) = client(200, "true");
        assert_eq!(c.retry_email_client("j1", "IPHONE15"), Outcome::Success(json!(true)));
        let req = last(&recorded);
        assert_eq!(req.param_names(), vec!["job", "clientcode", "apikey"]);
        assert_eq!(req.param("clientcode"), Some("IPHONE15"));
    }

    #[test]
    fn thumbnail_params_keep_service_casing() {
        let (c, recorded) = client(200, r#"{"RequestID":"r1"}"#);
        let _ = c.new_thumbnail("url", "https://example.com");
        assert_eq!(last(&recorded).param_names(), vec!["ContentType", "Content", "apikey"]);
        let _ = c.get_thumbnail("r1");
        assert_eq!(last(&recorded).param_names(), vec!["RequestID", "apikey"]);
    }

    #[test]
    fn server_error_yields_failure_for_every_shape() {
        let (c, _) = client(500, "internal error");
        assert!(c.system_status().is_failure());
        assert!(c.create_email_analytics_code("news").is_failure());
        assert!(c.fetch_preview("j1").is_failure());
    }

    #[test]
    fn connection_reset_yields_failure() {
        let c = PreviewClient::with_transport(
            "k",
            ClientConfig::default(),
            |_: &HttpRequest| -> Result<HttpResponse, TransportError> {
                Err(TransportError::Connection("connection reset".to_string()))
            },
        );
        assert_eq!(c.delete_preview("j1"), Outcome::Failure);
        assert_eq!(c.create_email_analytics_code("t"), Outcome::Failure);
    }
}
