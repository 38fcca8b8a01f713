use i0_consensus::{
    block_proof, check_header, decode_compact, difficulty, encode_compact, genesis_header,
    next_work_required, parse_block_header_bytes, Context, Hash256, HeaderChain, Settings, U256,
};
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
struct Request {
    op: String,

    /// Falls back to `I0_NETWORK`, then to main.
    #[serde(default)]
    network: Option<String>,

    #[serde(default)]
    bits: u32,

    #[serde(default)]
    target_hex: String,

    #[serde(default)]
    header_hex: String,

    #[serde(default)]
    height: u32,

    #[serde(default)]
    hash: String,

    /// Oldest-first window ending at the block the candidate builds on;
    /// `height` is the height of the first entry.
    #[serde(default)]
    window: Vec<WindowBlock>,

    #[serde(default)]
    candidate_time: u32,
}

#[derive(Deserialize)]
struct WindowBlock {
    time: u32,
    bits: u32,
}

#[derive(Serialize, Default)]
struct Response {
    ok: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    err: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    bits: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    target: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    negative: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    overflow: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    work: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    difficulty: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    block_hash: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    merkle_root: Option<String>,
}

impl Response {
    fn ok() -> Self {
        Self {
            ok: true,
            ..Self::default()
        }
    }

    fn fail(err: impl Into<String>) -> Self {
        Self {
            ok: false,
            err: Some(err.into()),
            ..Self::default()
        }
    }
}

fn context_for(req: &Request) -> Result<Context, Response> {
    let mut settings = Settings::from_env();
    if let Some(network) = &req.network {
        settings.network = network.clone();
    }
    Context::from_settings(&settings).map_err(|e| Response::fail(e.to_string()))
}

fn handle(req: Request) -> Result<Response, Response> {
    match req.op.as_str() {
        "compact_decode" => {
            let t = decode_compact(req.bits);
            Ok(Response {
                target: Some(t.value.to_string()),
                negative: Some(t.negative),
                overflow: Some(t.overflow),
                ..Response::ok()
            })
        }
        "compact_encode" => {
            let value: U256 = req
                .target_hex
                .parse()
                .map_err(|_| Response::fail("bad target"))?;
            Ok(Response {
                bits: Some(format!("{:08x}", encode_compact(&value))),
                ..Response::ok()
            })
        }
        "block_proof" => {
            let ctx = context_for(&req)?;
            Ok(Response {
                work: Some(block_proof(req.bits).to_string()),
                difficulty: Some(difficulty(req.bits, ctx.params())),
                ..Response::ok()
            })
        }
        "check_pow" => {
            let ctx = context_for(&req)?;
            let bytes = hex::decode(&req.header_hex).map_err(|_| Response::fail("bad header"))?;
            let header =
                parse_block_header_bytes(&bytes).map_err(|e| Response::fail(e.code().as_str()))?;
            let block_hash = Some(header.block_hash().to_string());
            match check_header(&header, ctx.params()) {
                Ok(()) => Ok(Response {
                    block_hash,
                    ..Response::ok()
                }),
                Err(e) => {
                    debug!("check_pow: {e}");
                    Err(Response {
                        block_hash,
                        ..Response::fail(e.code().as_str())
                    })
                }
            }
        }
        "check_checkpoint" => {
            let ctx = context_for(&req)?;
            let hash: Hash256 = req.hash.parse().map_err(|_| Response::fail("bad hash"))?;
            ctx.checkpoints()
                .verify_block(req.height, &hash)
                .map(|()| Response::ok())
                .map_err(|e| Response::fail(e.code().as_str()))
        }
        "genesis" => {
            let ctx = context_for(&req)?;
            let header = genesis_header(ctx.params());
            Ok(Response {
                block_hash: Some(header.block_hash().to_string()),
                merkle_root: Some(header.merkle_root.to_string()),
                bits: Some(format!("{:08x}", header.bits)),
                ..Response::ok()
            })
        }
        "next_work" => {
            let ctx = context_for(&req)?;
            let mut chain = HeaderChain::new();
            let mut last = None;
            for (i, b) in req.window.iter().enumerate() {
                let height = u32::try_from(i)
                    .ok()
                    .and_then(|i| req.height.checked_add(i))
                    .ok_or_else(|| Response::fail("window too long"))?;
                let mut hash = [0u8; 32];
                hash[..4].copy_from_slice(&height.to_le_bytes());
                let hash = Hash256(hash);
                let id = match last {
                    None => chain.insert_root(hash, height, b.time, b.bits, block_proof(b.bits), 0),
                    Some(parent) => chain.connect(parent, hash, b.time, b.bits, 0),
                }
                .map_err(|e| Response::fail(e.to_string()))?;
                last = Some(id);
            }
            let bits = next_work_required(&chain, last, req.candidate_time, ctx.params())
                .map_err(|e| Response::fail(e.to_string()))?;
            Ok(Response {
                bits: Some(format!("{bits:08x}")),
                ..Response::ok()
            })
        }
        _ => Err(Response::fail("unknown op")),
    }
}

fn main() {
    env_logger::init();

    let resp = match serde_json::from_reader::<_, Request>(std::io::stdin()) {
        Ok(req) => handle(req).unwrap_or_else(|resp| resp),
        Err(e) => Response::fail(format!("bad request: {e}")),
    };
    let _ = serde_json::to_writer(std::io::stdout(), &resp);
}
