pub mod audio_emitter;
pub mod native_service;
pub mod observer;
