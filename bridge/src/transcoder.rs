//! Frame transcoder: one PCM frame in, one packet out, and back.
//!
//! PCM crosses the boundary as little-endian signed 16-bit samples,
//! interleaved by channel. Scratch buffers are owned locals, so they are
//! freed on every return path, including errors.

use tracing::debug;

use crate::error::BridgeError;
use crate::registry::Registry;
use crate::session::{DecoderSession, EncoderSession, Token};

impl EncoderSession {
    /// Encodes one frame of `frame_size` samples per channel.
    ///
    /// The packet is never longer than `max_packet_bytes`; libopus lowers
    /// its bitrate to fit.
    pub fn encode_frame(
        &mut self,
        pcm: &[u8],
        frame_size: i32,
        max_packet_bytes: usize,
    ) -> Result<Vec<u8>, BridgeError> {
        if frame_size <= 0 {
            return Err(BridgeError::InvalidFrameSize(frame_size));
        }
        let samples = pcm_to_samples(pcm)?;
        let needed = frame_size as usize * self.config().channels as usize;
        if samples.len() < needed {
            return Err(BridgeError::ShortPcm {
                needed,
                got: samples.len(),
            });
        }

        let mut scratch = vec![0u8; max_packet_bytes];
        let n = self.encoder.encode_to(&samples, frame_size, &mut scratch)?;

        debug!(
            "encoded {} samples -> {} bytes ({:.1}% of input)",
            samples.len(),
            n,
            n as f32 * 100.0 / pcm.len() as f32
        );
        Ok(scratch[..n].to_vec())
    }
}

impl DecoderSession {
    /// Decodes one packet into at most `frame_size` samples per channel.
    ///
    /// Output is capped at `max_frame_samples` interleaved samples. An empty
    /// packet conceals one lost frame. Forward error correction is off.
    pub fn decode_frame(
        &mut self,
        packet: &[u8],
        frame_size: i32,
        max_frame_samples: usize,
    ) -> Result<Vec<u8>, BridgeError> {
        if frame_size <= 0 {
            return Err(BridgeError::InvalidFrameSize(frame_size));
        }

        let mut scratch = vec![0i16; max_frame_samples];
        let n = self.decoder.decode_to(packet, &mut scratch, frame_size, false)?;
        let samples = n * self.config().channels as usize;

        debug!("decoded {} bytes -> {} samples", packet.len(), n);
        Ok(samples_to_pcm(&scratch[..samples]))
    }
}

impl Registry {
    /// Encodes one PCM frame with the encoder named by `token`.
    pub fn encode(&self, token: Token, pcm: &[u8], frame_size: i32) -> Result<Vec<u8>, BridgeError> {
        let session = self.encoder(token)?;
        let mut session = session.lock();
        session.encode_frame(pcm, frame_size, self.config().max_packet_bytes)
    }

    /// Decodes one packet with the decoder named by `token`.
    pub fn decode(&self, token: Token, packet: &[u8], frame_size: i32) -> Result<Vec<u8>, BridgeError> {
        let session = self.decoder(token)?;
        let mut session = session.lock();
        session.decode_frame(packet, frame_size, self.config().max_frame_samples)
    }
}

fn pcm_to_samples(pcm: &[u8]) -> Result<Vec<i16>, BridgeError> {
    if pcm.len() % 2 != 0 {
        return Err(BridgeError::OddPcmLength(pcm.len()));
    }
    Ok(pcm
        .chunks_exact(2)
        .map(|b| i16::from_le_bytes([b[0], b[1]]))
        .collect())
}

fn samples_to_pcm(samples: &[i16]) -> Vec<u8> {
    let mut data = Vec::with_capacity(samples.len() * 2);
    for sample in samples {
        data.extend_from_slice(&sample.to_le_bytes());
    }
    data
}
