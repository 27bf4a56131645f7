//! Entry point for the WASM application

pub fn main() {
    vetfield_frontend::start();
}
