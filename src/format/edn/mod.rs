// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstate-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstate and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! EDN process documents: the value model, the display printer and a reader for parsing
//! documents back.

pub mod process;
pub mod value;

pub use process::{
    export_process, parse_process_document, render_process, ProcessDocument, TransitionRecord,
    FORMAT_TAG,
};
pub use value::{parse_edn, pretty_print, EdnParseError, EdnValue};
