//! Dyktafon Core
//!
//! Core types for the dyktafon voice-note tooling.
//!
//! This crate contains:
//! - Domain types: Core entities (`VoiceNote`, `NoteStatus`)
//! - DTOs: Wire-format types for talking to the voice-note service

pub mod domain;
pub mod dto;
