//! Triton inference-server transport.
//!
//! Speaks the KServe v2 HTTP protocol. The `logits` output is requested with
//! the binary-data extension, so responses arrive as a JSON header followed
//! by a raw little-endian tensor payload; FP16 payloads are widened to f32
//! before they reach the aggregator. Servers that answer with inline JSON
//! data are handled too. Readiness probes and the single-shot inference call
//! are the whole surface; retry policy belongs to the caller.

use std::time::Duration;

use half::f16;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::backend::ScoringBackend;
use crate::error::{Error, Result};

const INFER_HEADER_LENGTH: &str = "Inference-Header-Content-Length";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// HTTP client for one Triton-hosted scoring model.
///
/// The client owns its connection pool; dropping the backend releases it on
/// every exit path.
pub struct TritonBackend {
    http: reqwest::blocking::Client,
    base_url: String,
    model: String,
}

#[derive(Serialize)]
struct InferRequest<'a> {
    inputs: Vec<InputTensor<'a>>,
    outputs: Vec<OutputRequest<'a>>,
}

#[derive(Serialize)]
struct InputTensor<'a> {
    name: &'a str,
    shape: [usize; 2],
    datatype: &'a str,
    data: &'a [i64],
}

#[derive(Serialize)]
struct OutputRequest<'a> {
    name: &'a str,
    parameters: OutputRequestParameters,
}

#[derive(Serialize)]
struct OutputRequestParameters {
    binary_data: bool,
}

#[derive(Deserialize)]
struct InferResponse {
    outputs: Vec<OutputTensor>,
}

#[derive(Deserialize)]
struct OutputTensor {
    name: String,
    datatype: String,
    shape: Vec<i64>,
    #[serde(default)]
    data: Option<Vec<f32>>,
}

impl TritonBackend {
    /// Connects to `http://host:port` for the named model.
    pub fn new(host: &str, port: u16, model: &str) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: format!("http://{}:{}", host, port),
            model: model.to_string(),
        })
    }

    /// True when both the server and the model report ready.
    pub fn is_ready(&self) -> bool {
        self.probe(&format!("{}/v2/health/ready", self.base_url))
            && self.probe(&format!(
                "{}/v2/models/{}/ready",
                self.base_url, self.model
            ))
    }

    /// Fails with [`Error::NotReady`] unless the server and model are ready.
    pub fn ensure_ready(&self) -> Result<()> {
        if self.is_ready() {
            Ok(())
        } else {
            Err(Error::NotReady(format!(
                "{} (model {})",
                self.base_url, self.model
            )))
        }
    }

    fn probe(&self, url: &str) -> bool {
        self.http
            .get(url)
            .send()
            .map(|response| response.status().is_success())
            .unwrap_or(false)
    }

    fn infer(&self, input_ids: &[i64], attention_mask: &[i64]) -> Result<Array2<f32>> {
        let seq_len = input_ids.len();
        let request = InferRequest {
            inputs: vec![
                InputTensor {
                    name: "input_ids",
                    shape: [1, seq_len],
                    datatype: "INT64",
                    data: input_ids,
                },
                InputTensor {
                    name: "attention_mask",
                    shape: [1, seq_len],
                    datatype: "INT64",
                    data: attention_mask,
                },
            ],
            outputs: vec![OutputRequest {
                name: "logits",
                parameters: OutputRequestParameters { binary_data: true },
            }],
        };

        let response = self
            .http
            .post(format!("{}/v2/models/{}/infer", self.base_url, self.model))
            .json(&request)
            .send()?;

        if !response.status().is_success() {
            return Err(Error::Backend(format!(
                "inference request failed with status {}",
                response.status()
            )));
        }

        let header_len = response
            .headers()
            .get(INFER_HEADER_LENGTH)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<usize>().ok());
        let body = response.bytes()?;

        match header_len {
            Some(len) => parse_binary_response(&body, len),
            None => parse_json_response(&body),
        }
    }
}

impl ScoringBackend for TritonBackend {
    fn score(&self, input_ids: &[i64], attention_mask: &[i64]) -> Result<Array2<f32>> {
        self.infer(input_ids, attention_mask)
    }
}

/// Parses a response whose tensor payload follows the JSON header.
fn parse_binary_response(body: &[u8], header_len: usize) -> Result<Array2<f32>> {
    if header_len > body.len() {
        return Err(Error::Backend(
            "inference header length exceeds response body".to_string(),
        ));
    }

    let header: InferResponse = serde_json::from_slice(&body[..header_len])?;
    let output = find_logits(header)?;
    let (rows, cols) = output_dims(&output.shape)?;
    let count = rows * cols;

    let payload = &body[header_len..];
    let expected = count * byte_width(&output.datatype)?;
    if payload.len() < expected {
        return Err(Error::Backend(format!(
            "tensor payload truncated: expected {} bytes, got {}",
            expected,
            payload.len()
        )));
    }

    let flat = decode_scores(&payload[..expected], &output.datatype, count)?;
    into_array(flat, rows, cols)
}

/// Parses a response carrying the tensor as inline JSON numbers.
fn parse_json_response(body: &[u8]) -> Result<Array2<f32>> {
    let response: InferResponse = serde_json::from_slice(body)?;
    let output = find_logits(response)?;
    match output.datatype.as_str() {
        "FP16" | "FP32" => {}
        other => return Err(Error::UnsupportedDatatype(other.to_string())),
    }

    let (rows, cols) = output_dims(&output.shape)?;
    let count = rows * cols;
    let data = output
        .data
        .ok_or_else(|| Error::Backend("logits output carries no data".to_string()))?;
    if data.len() < count {
        return Err(Error::Backend(format!(
            "logits output truncated: expected {} values, got {}",
            count,
            data.len()
        )));
    }

    into_array(data[..count].to_vec(), rows, cols)
}

fn find_logits(response: InferResponse) -> Result<OutputTensor> {
    response
        .outputs
        .into_iter()
        .find(|output| output.name == "logits")
        .ok_or_else(|| Error::Backend("response is missing the logits output".to_string()))
}

/// Row/column dimensions of the logits tensor, batch dimension dropped.
fn output_dims(shape: &[i64]) -> Result<(usize, usize)> {
    if shape.len() < 2 {
        return Err(Error::Backend(format!(
            "unexpected logits shape {:?}",
            shape
        )));
    }
    let rows = shape[1].max(0) as usize;
    let cols = if shape.len() > 2 {
        shape[2].max(0) as usize
    } else {
        1
    };
    Ok((rows, cols))
}

fn byte_width(datatype: &str) -> Result<usize> {
    match datatype {
        "FP16" => Ok(2),
        "FP32" => Ok(4),
        other => Err(Error::UnsupportedDatatype(other.to_string())),
    }
}

/// Decodes a little-endian tensor payload into f32 values.
fn decode_scores(bytes: &[u8], datatype: &str, count: usize) -> Result<Vec<f32>> {
    match datatype {
        "FP32" => Ok(bytes
            .chunks_exact(4)
            .take(count)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect()),
        "FP16" => Ok(bytes
            .chunks_exact(2)
            .take(count)
            .map(|chunk| f16::from_le_bytes([chunk[0], chunk[1]]).to_f32())
            .collect()),
        other => Err(Error::UnsupportedDatatype(other.to_string())),
    }
}

fn into_array(flat: Vec<f32>, rows: usize, cols: usize) -> Result<Array2<f32>> {
    Array2::from_shape_vec((rows, cols), flat)
        .map_err(|e| Error::Backend(format!("failed to shape logits: {}", e)))
}
