//! Build script for meme-client
//!
//! Compiles the gRPC contract in `proto/memes.proto` into Rust code.
//!
//! ## Generated Code
//! - `MemeServiceClient`, used by the facade
//! - `MemeService` server trait, only with the `server` feature (enabled by
//!   the loopback mock in `meme-testkit`)
//! - Message types via prost

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let proto_file = "../../proto/memes.proto";

    let build_server = std::env::var_os("CARGO_FEATURE_SERVER").is_some();

    println!("cargo:rerun-if-changed={}", proto_file);

    tonic_build::configure()
        .build_server(build_server)
        .build_client(true)
        .compile_protos(&[proto_file], &["../../proto"])?;

    Ok(())
}
