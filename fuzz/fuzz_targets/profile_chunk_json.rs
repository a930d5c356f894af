#![no_main]

use brasa::chunk::{ChunkOptions, ProfileChunk};
use brasa::format::format_profile_chunk_analysis;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        if let Ok(chunk) = ProfileChunk::from_json_str(input) {
            let _ = format_profile_chunk_analysis(&chunk, &ChunkOptions::default());
        }
    }
});
