//! Minimal transaction-side serialization: enough to rebuild the genesis
//! coinbase bit for bit.

pub const OP_PUSHDATA1: u8 = 0x4c;
pub const OP_CHECKSIG: u8 = 0xac;

pub fn encode_compact_size(n: u64, out: &mut Vec<u8>) {
    match n {
        0x00..=0xfc => out.push(n as u8),
        0xfd..=0xffff => {
            out.push(0xfd);
            out.extend_from_slice(&(n as u16).to_le_bytes());
        }
        0x1_0000..=0xffff_ffff => {
            out.push(0xfe);
            out.extend_from_slice(&(n as u32).to_le_bytes());
        }
        _ => {
            out.push(0xff);
            out.extend_from_slice(&n.to_le_bytes());
        }
    }
}

/// Appends a data push to a script. Pushes longer than 255 bytes never occur
/// in the scripts built here.
pub fn push_data(script: &mut Vec<u8>, data: &[u8]) {
    if data.len() < OP_PUSHDATA1 as usize {
        script.push(data.len() as u8);
    } else {
        script.push(OP_PUSHDATA1);
        script.push(data.len() as u8);
    }
    script.extend_from_slice(data);
}

/// Minimal little-endian sign-magnitude encoding of a script number.
pub fn script_num_bytes(n: i64) -> Vec<u8> {
    if n == 0 {
        return Vec::new();
    }
    let negative = n < 0;
    let mut abs = n.unsigned_abs();
    let mut out = Vec::new();
    while abs > 0 {
        out.push((abs & 0xff) as u8);
        abs >>= 8;
    }
    let last = out.len() - 1;
    if out[last] & 0x80 != 0 {
        out.push(if negative { 0x80 } else { 0x00 });
    } else if negative {
        out[last] |= 0x80;
    }
    out
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxIn {
    pub prev_txid: [u8; 32],
    pub prev_vout: u32,
    pub script_sig: Vec<u8>,
    pub sequence: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxOut {
    pub value: i64,
    pub script_pubkey: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub version: i32,
    pub inputs: Vec<TxIn>,
    pub outputs: Vec<TxOut>,
    pub locktime: u32,
}

pub fn tx_bytes(tx: &Transaction) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&tx.version.to_le_bytes());
    encode_compact_size(tx.inputs.len() as u64, &mut out);
    for input in &tx.inputs {
        out.extend_from_slice(&input.prev_txid);
        out.extend_from_slice(&input.prev_vout.to_le_bytes());
        encode_compact_size(input.script_sig.len() as u64, &mut out);
        out.extend_from_slice(&input.script_sig);
        out.extend_from_slice(&input.sequence.to_le_bytes());
    }
    encode_compact_size(tx.outputs.len() as u64, &mut out);
    for output in &tx.outputs {
        out.extend_from_slice(&output.value.to_le_bytes());
        encode_compact_size(output.script_pubkey.len() as u64, &mut out);
        out.extend_from_slice(&output.script_pubkey);
    }
    out.extend_from_slice(&tx.locktime.to_le_bytes());
    out
}
