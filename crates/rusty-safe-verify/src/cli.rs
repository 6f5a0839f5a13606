use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "rusty-safe-verify")]
#[command(about = "Verify a Safe transaction hash and its owner signatures", long_about = None)]
pub struct Cli {
    /// Safe share link (`...?safe=eth:0x..&id=multisig_..`) or block explorer transaction URL
    #[arg(value_name = "REFERENCE")]
    pub reference: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Timeout for each HTTP or RPC request, in milliseconds
    #[arg(long, env = "RUSTY_SAFE_HTTP_TIMEOUT_MS")]
    pub timeout_ms: Option<u64>,

    /// Safe client gateway base URL
    #[arg(long, env = "RUSTY_SAFE_GATEWAY_URL")]
    pub gateway_url: Option<String>,

    /// RPC endpoint for a chain, as `<chain_id>=<url>` (repeatable)
    #[arg(long = "rpc-url", value_name = "CHAIN_ID=URL", value_parser = parse_rpc_override)]
    pub rpc_urls: Vec<(u64, String)>,
}

fn parse_rpc_override(s: &str) -> Result<(u64, String), String> {
    let (chain, url) = s
        .split_once('=')
        .ok_or_else(|| format!("expected <chain_id>=<url>, got {s:?}"))?;
    let chain_id = chain
        .trim()
        .parse()
        .map_err(|e| format!("invalid chain id {chain:?}: {e}"))?;
    if url.is_empty() {
        return Err("empty RPC url".to_owned());
    }
    Ok((chain_id, url.to_owned()))
}
