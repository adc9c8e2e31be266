//! End-to-end scenarios across the registry and transcoder.

use std::sync::Arc;
use std::thread;

use crate::*;

const FRAME: usize = 320; // 20ms at 16kHz

fn tone_frame(index: usize, freq: f32, amplitude: f32) -> Vec<u8> {
    let mut data = Vec::with_capacity(FRAME * 2);
    for i in 0..FRAME {
        let t = (index * FRAME + i) as f32 / 16000.0;
        let sample = ((t * freq * 2.0 * std::f32::consts::PI).sin() * amplitude) as i16;
        data.extend_from_slice(&sample.to_le_bytes());
    }
    data
}

/// Runs `frames` encode/decode calls on fresh sessions, returning every
/// packet and decoded frame.
fn run_stream(registry: &Registry, frames: usize, freq: f32, amplitude: f32) -> Vec<(Vec<u8>, Vec<u8>)> {
    let enc = registry
        .create_encoder(&EncoderConfig {
            vbr: true,
            dtx: false,
            ..EncoderConfig::default()
        })
        .unwrap();
    let dec = registry.create_decoder(&DecoderConfig::default()).unwrap();

    let mut out = Vec::with_capacity(frames);
    for index in 0..frames {
        let pcm = tone_frame(index, freq, amplitude);
        let packet = registry.encode(enc, &pcm, FRAME as i32).unwrap();
        let decoded = registry.decode(dec, &packet, FRAME as i32).unwrap();
        assert_eq!(decoded.len(), FRAME * 2);
        out.push((packet, decoded));
    }

    registry.release(enc, Role::Encoder).unwrap();
    registry.release(dec, Role::Decoder).unwrap();
    out
}

#[test]
fn test_voice_call_scenario() {
    let registry = Registry::default();
    let token = registry
        .create_encoder(&EncoderConfig {
            sample_rate: 16000,
            channels: 1,
            application: Application::VoIP.raw(),
            bitrate: 16000,
            complexity: 5,
            vbr: false,
            dtx: true,
        })
        .unwrap();
    assert!(!token.is_none());

    let packet = registry.encode(token, &[0u8; 320], 160).unwrap();
    assert!(!packet.is_empty());
    assert!(packet.len() <= 1024);

    registry.release(token, Role::Encoder).unwrap();
    assert_eq!(
        registry.encode(token, &[0u8; 320], 160),
        Err(BridgeError::Released(token))
    );
}

#[test]
fn test_sessions_do_not_share_state() {
    let registry = Registry::default();
    let reference_a = run_stream(&registry, 50, 440.0, 8000.0);
    let reference_b = run_stream(&registry, 50, 1200.0, 3000.0);

    // Same input on fresh sessions yields the same output, regardless of
    // what another session did in between.
    assert_eq!(run_stream(&registry, 50, 440.0, 8000.0), reference_a);
    assert_ne!(reference_a, reference_b);
    assert_eq!(registry.live_sessions(), 0);
}

#[test]
fn test_concurrent_sessions_are_isolated() {
    const FRAMES: usize = 1000;

    let reference = Registry::default();
    let expected_a = run_stream(&reference, FRAMES, 440.0, 8000.0);
    let expected_b = run_stream(&reference, FRAMES, 1200.0, 3000.0);

    let registry = Arc::new(Registry::default());
    let a = {
        let registry = Arc::clone(&registry);
        thread::spawn(move || run_stream(&registry, FRAMES, 440.0, 8000.0))
    };
    let b = {
        let registry = Arc::clone(&registry);
        thread::spawn(move || run_stream(&registry, FRAMES, 1200.0, 3000.0))
    };

    let got_a = a.join().unwrap();
    let got_b = b.join().unwrap();
    assert_eq!(got_a.len(), FRAMES);
    assert_eq!(got_b.len(), FRAMES);
    assert!(got_a == expected_a, "stream A diverged under concurrency");
    assert!(got_b == expected_b, "stream B diverged under concurrency");
    assert_eq!(registry.live_sessions(), 0);
}

#[test]
fn test_concurrent_create_release() {
    let registry = Arc::new(Registry::default());
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                let mut tokens = Vec::new();
                for _ in 0..25 {
                    tokens.push(registry.create_decoder(&DecoderConfig::default()).unwrap());
                }
                for token in &tokens {
                    registry.release(*token, Role::Decoder).unwrap();
                }
                tokens
            })
        })
        .collect();

    let mut all: Vec<Token> = handles.into_iter().flat_map(|h| h.join().unwrap()).collect();
    all.sort();
    all.dedup();
    assert_eq!(all.len(), 200);
    assert_eq!(registry.live_sessions(), 0);
}

#[test]
fn test_release_during_use_is_rejected_afterwards() {
    let registry = Registry::default();
    let enc = registry.create_encoder(&EncoderConfig::default()).unwrap();
    let session = registry.encoder(enc).unwrap();

    registry.release(enc, Role::Encoder).unwrap();

    // An in-flight reference finishes its call; new lookups fail.
    let packet = session
        .lock()
        .encode_frame(&[0u8; 640], 320, registry.config().max_packet_bytes)
        .unwrap();
    assert!(!packet.is_empty());
    drop(session);
    assert_eq!(registry.encode(enc, &[0u8; 640], 320), Err(BridgeError::Released(enc)));
}
