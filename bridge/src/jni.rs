//! JNI exports for `com.bitchat.android.audio.OpusCodec`.
//!
//! Each native method copies its Java arrays in, calls [`crate::api`], and
//! copies the result out. Failures surface to Java as `0` or `null`.

use std::ptr;

use ::jni::JNIEnv;
use ::jni::objects::{JByteArray, JObject};
use ::jni::sys::{JNI_FALSE, jboolean, jbyteArray, jint, jlong, jstring};
use tracing::error;

use crate::api;

#[unsafe(no_mangle)]
pub extern "system" fn Java_com_bitchat_android_audio_OpusCodec_nativeInitEncoder<'local>(
    _env: JNIEnv<'local>,
    _this: JObject<'local>,
    sample_rate: jint,
    channels: jint,
    application: jint,
    bitrate: jint,
    complexity: jint,
    vbr: jboolean,
    dtx: jboolean,
) -> jlong {
    api::init_encoder(
        sample_rate,
        channels,
        application,
        bitrate,
        complexity,
        vbr != JNI_FALSE,
        dtx != JNI_FALSE,
    )
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_com_bitchat_android_audio_OpusCodec_nativeInitDecoder<'local>(
    _env: JNIEnv<'local>,
    _this: JObject<'local>,
    sample_rate: jint,
    channels: jint,
) -> jlong {
    api::init_decoder(sample_rate, channels)
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_com_bitchat_android_audio_OpusCodec_nativeEncode<'local>(
    env: JNIEnv<'local>,
    _this: JObject<'local>,
    encoder_handle: jlong,
    pcm_data: JByteArray<'local>,
    frame_size: jint,
) -> jbyteArray {
    if encoder_handle == 0 {
        error!("encoder not initialized");
        return ptr::null_mut();
    }
    let Some(pcm) = read_array(&env, &pcm_data) else {
        return ptr::null_mut();
    };
    match api::encode(encoder_handle, &pcm, frame_size) {
        Some(packet) => new_array(&env, &packet),
        None => ptr::null_mut(),
    }
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_com_bitchat_android_audio_OpusCodec_nativeDecode<'local>(
    env: JNIEnv<'local>,
    _this: JObject<'local>,
    decoder_handle: jlong,
    opus_data: JByteArray<'local>,
    frame_size: jint,
) -> jbyteArray {
    if decoder_handle == 0 {
        error!("decoder not initialized");
        return ptr::null_mut();
    }
    let Some(packet) = read_array(&env, &opus_data) else {
        return ptr::null_mut();
    };
    match api::decode(decoder_handle, &packet, frame_size) {
        Some(pcm) => new_array(&env, &pcm),
        None => ptr::null_mut(),
    }
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_com_bitchat_android_audio_OpusCodec_nativeGetVersion<'local>(
    env: JNIEnv<'local>,
    _this: JObject<'local>,
) -> jstring {
    match env.new_string(api::version()) {
        Ok(s) => s.into_raw(),
        Err(err) => {
            error!("failed to create version string: {}", err);
            ptr::null_mut()
        }
    }
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_com_bitchat_android_audio_OpusCodec_nativeReleaseEncoder<'local>(
    _env: JNIEnv<'local>,
    _this: JObject<'local>,
    encoder_handle: jlong,
) {
    api::release_encoder(encoder_handle);
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_com_bitchat_android_audio_OpusCodec_nativeReleaseDecoder<'local>(
    _env: JNIEnv<'local>,
    _this: JObject<'local>,
    decoder_handle: jlong,
) {
    api::release_decoder(decoder_handle);
}

fn read_array(env: &JNIEnv<'_>, array: &JByteArray<'_>) -> Option<Vec<u8>> {
    if array.is_null() {
        error!("null byte array");
        return None;
    }
    env.convert_byte_array(array)
        .inspect_err(|err| error!("failed to read byte array: {}", err))
        .ok()
}

fn new_array(env: &JNIEnv<'_>, bytes: &[u8]) -> jbyteArray {
    match env.byte_array_from_slice(bytes) {
        Ok(array) => array.into_raw(),
        Err(err) => {
            error!("failed to allocate byte array: {}", err);
            ptr::null_mut()
        }
    }
}
