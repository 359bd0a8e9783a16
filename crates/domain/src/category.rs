// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The fixed set of job categories.
///
/// Tasks are always posted into exactly one of these categories; there
/// is no free-form category input anywhere in the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Blog posts, articles, and marketing copy.
    ContentWriting,
    /// Essays, research summaries, and coursework support.
    AcademicWriting,
    /// Audio and video transcription.
    Transcription,
    /// Logos, banners, and visual assets.
    GraphicDesign,
    /// Structured data capture and verification.
    DataEntry,
    /// Websites and web applications.
    WebDevelopment,
    /// Cutting, captioning, and post-production.
    VideoEditing,
    /// Document translation.
    Translation,
    /// Administrative support work.
    VirtualAssistant,
    /// Account management and content scheduling.
    SocialMedia,
}

impl Category {
    /// All categories, in display order.
    pub const ALL: [Self; 10] = [
        Self::ContentWriting,
        Self::AcademicWriting,
        Self::Transcription,
        Self::GraphicDesign,
        Self::DataEntry,
        Self::WebDevelopment,
        Self::VideoEditing,
        Self::Translation,
        Self::VirtualAssistant,
        Self::SocialMedia,
    ];

    /// Converts this category to its display string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ContentWriting => "Content Writing",
            Self::AcademicWriting => "Academic Writing",
            Self::Transcription => "Transcription",
            Self::GraphicDesign => "Graphic Design",
            Self::DataEntry => "Data Entry",
            Self::WebDevelopment => "Web Development",
            Self::VideoEditing => "Video Editing",
            Self::Translation => "Translation",
            Self::VirtualAssistant => "Virtual Assistant",
            Self::SocialMedia => "Social Media",
        }
    }
}

impl FromStr for Category {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Content Writing" => Ok(Self::ContentWriting),
            "Academic Writing" => Ok(Self::AcademicWriting),
            "Transcription" => Ok(Self::Transcription),
            "Graphic Design" => Ok(Self::GraphicDesign),
            "Data Entry" => Ok(Self::DataEntry),
            "Web Development" => Ok(Self::WebDevelopment),
            "Video Editing" => Ok(Self::VideoEditing),
            "Translation" => Ok(Self::Translation),
            "Virtual Assistant" => Ok(Self::VirtualAssistant),
            "Social Media" => Ok(Self::SocialMedia),
            _ => Err(DomainError::InvalidCategory(s.to_string())),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
