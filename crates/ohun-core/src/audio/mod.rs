//! Audio encoding for text-to-speech output

mod encoder;
mod wav;

pub use encoder::{
    decode_wav_data_uri, encode_pcm_to_wav_data_uri, encode_pcm_to_wav_data_uri_with,
    AudioEncoder, AudioFormat, DecodedWav, EncodedAudio, WAV_DATA_URI_PREFIX,
};
pub use wav::{encode_wav, quantize_i16, BitDepth, PcmFormat, WAV_HEADER_LEN};
