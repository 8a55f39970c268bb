//! Stage ordering and short-circuit behaviour, exercised through
//! `Router::dispatch` without a socket.

use ghost_router::{
    HttpError, NullModel, NullProcessor, NullValidator, NullWriter, Processor, Request,
    RequestModel, Router, Validator, Writer,
};
use http::Method;
use std::sync::{Arc, Mutex};

type Log = Arc<Mutex<Vec<String>>>;

fn push(log: &Log, entry: &str) {
    log.lock().unwrap().push(entry.to_string());
}

fn entries(log: &Log) -> Vec<String> {
    log.lock().unwrap().clone()
}

#[derive(Default)]
struct Ctx {
    seen: Vec<&'static str>,
}

/// Which stage, if any, should fail.
#[derive(Clone, Copy, PartialEq)]
enum FailAt {
    Nowhere,
    Model,
    Validator,
    Processor,
    Writer,
}

struct RecordingModel(Log, FailAt);

impl RequestModel<Ctx> for RecordingModel {
    type Model = Vec<&'static str>;

    fn from_request(&self, req: &Request<Ctx>) -> Result<Self::Model, HttpError> {
        push(&self.0, "model");
        if self.1 == FailAt::Model {
            return Err(HttpError::bad_request("bad model"));
        }
        Ok(req.context.seen.clone())
    }
}

struct RecordingValidator(Log, FailAt);

impl Validator<Vec<&'static str>> for RecordingValidator {
    fn validate(&self, _model: &Vec<&'static str>) -> Result<(), HttpError> {
        push(&self.0, "validate");
        if self.1 == FailAt::Validator {
            return Err(HttpError::new("unprocessable", 422));
        }
        Ok(())
    }
}

struct RecordingProcessor(Log, FailAt);

impl Processor<Vec<&'static str>> for RecordingProcessor {
    type Output = String;

    fn process(&self, model: Vec<&'static str>) -> Result<String, HttpError> {
        push(&self.0, "process");
        if self.1 == FailAt::Processor {
            return Err(HttpError::internal("processor failed"));
        }
        Ok(model.join(","))
    }
}

struct RecordingWriter(Log, FailAt);

impl Writer<String> for RecordingWriter {
    fn serialize(&self, output: &String) -> Result<Vec<u8>, HttpError> {
        push(&self.0, "write");
        if self.1 == FailAt::Writer {
            return Err(HttpError::internal("writer failed"));
        }
        Ok(output.as_bytes().to_vec())
    }

    fn content_type(&self) -> Option<&'static str> {
        Some("text/csv")
    }
}

fn recording_router(log: &Log, fail: FailAt) -> Router<Ctx> {
    let mut router = Router::<Ctx>::with_context();
    let (k1, k2) = (log.clone(), log.clone());
    router
        .add_route("/run")
        .extender(move |req: &mut Request<Ctx>| {
            push(&k1, "k1");
            req.context.seen.push("k1");
        })
        .extender(move |req: &mut Request<Ctx>| {
            push(&k2, "k2");
            if req.context.seen.contains(&"k1") {
                req.context.seen.push("k2");
            }
        })
        .model(RecordingModel(log.clone(), fail))
        .validator(RecordingValidator(log.clone(), fail))
        .processor(RecordingProcessor(log.clone(), fail))
        .writer(RecordingWriter(log.clone(), fail))
        .register()
        .unwrap();
    router
}

fn run(fail: FailAt) -> (u16, String, Vec<String>) {
    let log = Log::default();
    let router = recording_router(&log, fail);
    let res = router.dispatch(Request::new(Method::GET, "/run"));
    (res.status, res.body_text(), entries(&log))
}

#[test]
fn test_all_stages_run_in_order() {
    let (status, body, log) = run(FailAt::Nowhere);
    assert_eq!(status, 200);
    // Later extenders see what earlier ones wrote
    assert_eq!(body, "k1,k2");
    assert_eq!(log, ["k1", "k2", "model", "validate", "process", "write"]);
}

#[test]
fn test_extender_reading_a_later_value_sees_nothing() {
    let log = Log::default();
    let mut router = Router::<Ctx>::with_context();
    router
        .add_route("/run")
        .extender(|req: &mut Request<Ctx>| {
            if req.context.seen.contains(&"k1") {
                req.context.seen.push("k2");
            }
        })
        .extender(|req: &mut Request<Ctx>| req.context.seen.push("k1"))
        .model(RecordingModel(log.clone(), FailAt::Nowhere))
        .validator(RecordingValidator(log.clone(), FailAt::Nowhere))
        .processor(RecordingProcessor(log.clone(), FailAt::Nowhere))
        .writer(RecordingWriter(log.clone(), FailAt::Nowhere))
        .register()
        .unwrap();

    let res = router.dispatch(Request::new(Method::GET, "/run"));
    assert_eq!(res.body_text(), "k1");
}

#[test]
fn test_model_failure_stops_pipeline() {
    let (status, body, log) = run(FailAt::Model);
    assert_eq!((status, body.as_str()), (400, "bad model"));
    assert_eq!(log, ["k1", "k2", "model"]);
}

#[test]
fn test_validator_failure_stops_pipeline() {
    let (status, body, log) = run(FailAt::Validator);
    assert_eq!((status, body.as_str()), (422, "unprocessable"));
    assert_eq!(log, ["k1", "k2", "model", "validate"]);
}

#[test]
fn test_processor_failure_stops_pipeline() {
    let (status, body, log) = run(FailAt::Processor);
    assert_eq!((status, body.as_str()), (500, "processor failed"));
    assert_eq!(log, ["k1", "k2", "model", "validate", "process"]);
}

#[test]
fn test_writer_failure_discards_partial_output() {
    let (status, body, log) = run(FailAt::Writer);
    assert_eq!((status, body.as_str()), (500, "writer failed"));
    assert_eq!(log, ["k1", "k2", "model", "validate", "process", "write"]);
}

#[test]
fn test_writer_content_type_is_used_on_success_only() {
    let log = Log::default();
    let router = recording_router(&log, FailAt::Nowhere);
    let res = router.dispatch(Request::new(Method::GET, "/run"));
    assert_eq!(res.content_type.map(|ct| ct.value()), Some("text/csv"));

    let router = recording_router(&log, FailAt::Writer);
    let res = router.dispatch(Request::new(Method::GET, "/run"));
    assert_eq!(
        res.content_type.map(|ct| ct.value()),
        Some("text/plain; charset=utf-8")
    );
}

#[test]
fn test_each_request_gets_a_fresh_context() {
    let log = Log::default();
    let router = recording_router(&log, FailAt::Nowhere);
    for _ in 0..3 {
        let res = router.dispatch(Request::new(Method::GET, "/run"));
        assert_eq!(res.body_text(), "k1,k2");
    }
}

#[test]
fn test_explicit_null_stages_match_defaults() {
    let mut router = Router::new();
    router.add_route("/defaults").register().unwrap();
    router
        .add_route("/explicit")
        .model(NullModel)
        .validator(NullValidator)
        .processor(NullProcessor)
        .writer(NullWriter)
        .register()
        .unwrap();

    let defaults = router.dispatch(Request::new(Method::POST, "/defaults").with_body("x"));
    let explicit = router.dispatch(Request::new(Method::POST, "/explicit").with_body("x"));
    assert_eq!(defaults.status, 200);
    assert!(defaults.body.is_empty());
    assert_eq!(defaults.content_type, None);
    assert_eq!(
        (defaults.status, defaults.body, defaults.content_type),
        (explicit.status, explicit.body, explicit.content_type)
    );
}

#[test]
fn test_path_params_are_visible_to_the_model() {
    struct Pair;

    impl RequestModel<()> for Pair {
        type Model = (String, String);

        fn from_request(&self, req: &Request) -> Result<Self::Model, HttpError> {
            Ok((
                req.require_path_param("org")?.to_string(),
                req.require_path_param("repo")?.to_string(),
            ))
        }
    }

    struct Join;

    impl Processor<(String, String)> for Join {
        type Output = String;

        fn process(&self, (org, repo): (String, String)) -> Result<String, HttpError> {
            Ok(format!("{org}/{repo}"))
        }
    }

    struct Plain;

    impl Writer<String> for Plain {
        fn serialize(&self, output: &String) -> Result<Vec<u8>, HttpError> {
            Ok(output.clone().into_bytes())
        }
    }

    let mut router = Router::new();
    router
        .add_route("/repos/{org}/{repo}")
        .methods([Method::GET])
        .model(Pair)
        .processor(Join)
        .writer(Plain)
        .register()
        .unwrap();

    let res = router.dispatch(Request::new(Method::GET, "/repos/rust-lang/cargo?tab=issues"));
    assert_eq!(res.status, 200);
    assert_eq!(res.body_text(), "rust-lang/cargo");
}
