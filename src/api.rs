// API client module: a small blocking HTTP client for a Kubo-compatible
// `/api/v0` RPC endpoint. It implements `ContentStore` so the interactive
// flows never see HTTP.

use crate::config::Config;
use crate::error::{StoreError, StoreResult};
use crate::store::{
    AddContent, AddEntry, AddEvent, AddOptions, AddStream, AddedEntry, ByteStream, Cid,
    ContentStore, EntryType, ListEntry, ProgressEvent,
};
use anyhow::{Context, Result};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::blocking::{multipart, Client, Response};
use serde::Deserialize;
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Lines};

/// Blocking client holding a reqwest client and the RPC base URL.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

/// `files/stat` response; only the type matters here.
#[derive(Deserialize, Debug)]
struct StatResponse {
    #[serde(rename = "Type")]
    kind: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct LsResponse {
    #[serde(default)]
    objects: Vec<LsObject>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct LsObject {
    #[serde(default)]
    links: Vec<LsLink>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct LsLink {
    name: String,
    hash: String,
    #[serde(rename = "Type", default)]
    kind: i32,
}

/// One NDJSON line of an `add` response: a progress report, a stored
/// object, or an error object.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct AddLine {
    #[serde(default)]
    name: String,
    hash: Option<String>,
    bytes: Option<u64>,
    message: Option<String>,
}

/// Body of a non-2xx response.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct ErrorBody {
    message: String,
}

impl ApiClient {
    /// Create an ApiClient from the loaded configuration. The client-wide
    /// timeout also bounds long `get`/`cat` transfers.
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ApiClient {
            client,
            base_url: config.api_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, command: &str) -> String {
        format!("{}/api/v0/{}", self.base_url, command)
    }

    /// POST an RPC command with query arguments and check the status.
    fn call(&self, op: &'static str, command: &str, query: &[(&str, String)]) -> StoreResult<Response> {
        log::debug!("rpc {} {:?}", command, query);
        let res = self
            .client
            .post(self.endpoint(command))
            .query(query)
            .send()?;
        check_status(op, res)
    }
}

/// Turn a non-success response into `StoreError::Rejected`, keeping the
/// store's own message when it sent one.
fn check_status(op: &'static str, res: Response) -> StoreResult<Response> {
    if res.status().is_success() {
        return Ok(res);
    }
    let status = res.status();
    let txt = res.text().unwrap_or_default();
    let body = serde_json::from_str::<ErrorBody>(&txt)
        .map(|e| e.message)
        .unwrap_or(txt);
    log::warn!("{} rejected: {} - {}", op, status, body);
    Err(StoreError::Rejected {
        op,
        status: status.to_string(),
        body,
    })
}

fn link_type(kind: i32) -> EntryType {
    // unixfs data types: 0 raw, 1 directory, 2 file, 5 HAMT shard.
    match kind {
        1 | 5 => EntryType::Directory,
        0 | 2 => EntryType::File,
        _ => EntryType::Other,
    }
}

/// Characters left alone when encoding upload names, matching JavaScript's
/// `encodeURIComponent`. The store URL-decodes names, so `+`, `%` and
/// space must be escaped.
const NAME_KEEP: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode each `/`-separated component of a relative upload path.
fn encode_upload_name(path: &str) -> String {
    path.split('/')
        .map(|component| utf8_percent_encode(component, NAME_KEEP).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

fn entry_part(entry: AddEntry) -> StoreResult<multipart::Part> {
    let part = match entry.content {
        AddContent::File(local) => {
            multipart::Part::file(&local)?.mime_str("application/octet-stream")?
        }
        AddContent::Directory => {
            multipart::Part::bytes(Vec::new()).mime_str("application/x-directory")?
        }
    };
    Ok(part.file_name(encode_upload_name(&entry.path)))
}

/// Converts the store's per-file cumulative byte counts into deltas.
#[derive(Default, Debug)]
pub struct ProgressDeltas {
    reported: HashMap<String, u64>,
}

impl ProgressDeltas {
    /// Bytes for `unit` since its previous report. A count lower than the
    /// last one (a restarted unit) yields zero rather than going backwards.
    pub fn delta(&mut self, unit: &str, cumulative: u64) -> u64 {
        let seen = self.reported.entry(unit.to_string()).or_insert(0);
        let delta = cumulative.saturating_sub(*seen);
        *seen = (*seen).max(cumulative);
        delta
    }
}

/// Decode one line of an `add` response.
fn decode_add_line(line: &str, deltas: &mut ProgressDeltas) -> StoreResult<AddEvent> {
    let parsed: AddLine = serde_json::from_str(line)?;
    if let Some(message) = parsed.message {
        return Err(StoreError::Rejected {
            op: "add",
            status: "stream error".into(),
            body: message,
        });
    }
    if let Some(hash) = parsed.hash {
        return Ok(AddEvent::Added(AddedEntry {
            path: parsed.name,
            cid: Cid::from(hash),
        }));
    }
    let bytes = deltas.delta(&parsed.name, parsed.bytes.unwrap_or(0));
    Ok(AddEvent::Progress(ProgressEvent {
        bytes,
        unit: parsed.name,
    }))
}

/// Lazily reads an `add` response body, one event per line.
struct AddResponseStream {
    lines: Lines<BufReader<Response>>,
    deltas: ProgressDeltas,
}

impl Iterator for AddResponseStream {
    type Item = StoreResult<AddEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(err) => return Some(Err(err.into())),
            };
            if line.trim().is_empty() {
                continue;
            }
            return Some(decode_add_line(&line, &mut self.deltas));
        }
    }
}

impl ContentStore for ApiClient {
    fn add(&self, entry: AddEntry, options: &AddOptions) -> StoreResult<AddStream<'_>> {
        self.add_all(vec![entry], options)
    }

    fn add_all(&self, entries: Vec<AddEntry>, options: &AddOptions) -> StoreResult<AddStream<'_>> {
        // Names are already encoded by `encode_upload_name`.
        let mut form = multipart::Form::new().percent_encode_noop();
        for entry in entries {
            form = form.part("file", entry_part(entry)?);
        }
        let query = [
            ("pin", options.pin.to_string()),
            ("wrap-with-directory", options.wrap_with_directory.to_string()),
            ("progress", options.progress.to_string()),
            ("stream-channels", "true".to_string()),
        ];
        log::debug!("rpc add {:?}", query);
        let res = self
            .client
            .post(self.endpoint("add"))
            .query(&query)
            .multipart(form)
            .timeout(options.timeout)
            .send()?;
        let res = check_status("add", res)?;
        Ok(Box::new(AddResponseStream {
            lines: BufReader::new(res).lines(),
            deltas: ProgressDeltas::default(),
        }))
    }

    fn get(&self, cid: &Cid) -> StoreResult<ByteStream> {
        let res = self.call("get", "get", &[("arg", cid.to_string())])?;
        Ok(Box::new(res))
    }

    fn cat(&self, cid: &Cid) -> StoreResult<ByteStream> {
        let res = self.call("cat", "cat", &[("arg", cid.to_string())])?;
        Ok(Box::new(res))
    }

    /// A file lists as a single entry naming itself; a directory lists its
    /// links with paths under the CID.
    fn ls(&self, cid: &Cid) -> StoreResult<Vec<ListEntry>> {
        let stat: StatResponse = self
            .call("ls", "files/stat", &[("arg", format!("/ipfs/{cid}"))])?
            .json()?;
        if stat.kind == "file" {
            return Ok(vec![ListEntry {
                name: cid.to_string(),
                path: cid.to_string(),
                cid: cid.clone(),
                entry_type: EntryType::File,
            }]);
        }

        let listing: LsResponse = self.call("ls", "ls", &[("arg", cid.to_string())])?.json()?;
        Ok(listing
            .objects
            .into_iter()
            .flat_map(|object| object.links)
            .map(|link| ListEntry {
                path: format!("{cid}/{}", link.name),
                entry_type: link_type(link.kind),
                cid: Cid::from(link.hash),
                name: link.name,
            })
            .collect())
    }
}
