//! No-op stages installed on every new route.

use crate::error::HttpError;
use crate::pipeline::{Processor, RequestModel, Validator, Writer};
use crate::request::Request;

/// A null model accepts any request and produces `()`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullModel;

impl<C> RequestModel<C> for NullModel {
    type Model = ();

    fn from_request(&self, _req: &Request<C>) -> Result<(), HttpError> {
        Ok(())
    }
}

/// A null validator never fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullValidator;

impl<M> Validator<M> for NullValidator {
    fn validate(&self, _model: &M) -> Result<(), HttpError> {
        Ok(())
    }
}

/// A null processor returns an empty output.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProcessor;

impl<M> Processor<M> for NullProcessor {
    type Output = ();

    fn process(&self, _model: M) -> Result<(), HttpError> {
        Ok(())
    }
}

/// A null writer returns an empty body.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullWriter;

impl<O> Writer<O> for NullWriter {
    fn serialize(&self, _output: &O) -> Result<Vec<u8>, HttpError> {
        Ok(Vec::new())
    }
}
