// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::services::report_renderer::{
    DocumentEncoder, ReportError, ReportLayout, PAGE_HEIGHT_MM, PAGE_WIDTH_MM,
};
use printpdf::{BuiltinFont, Mm, PdfDocument};

const PT_TO_MM: f32 = 0.3528;

/// 基于printpdf的PDF编码器
///
/// 只使用内置Helvetica字体，输入文本须为可打印ASCII
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfEncoder;

impl DocumentEncoder for PdfEncoder {
    fn encode(&self, layout: &ReportLayout) -> Result<Vec<u8>, ReportError> {
        let (doc, first_page, first_layer) = PdfDocument::new(
            layout.title.as_str(),
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            "Layer 1",
        );
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ReportError::Encode(e.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ReportError::Encode(e.to_string()))?;

        for (index, page) in layout.pages.iter().enumerate() {
            let (page_index, layer_index) = if index == 0 {
                (first_page, first_layer)
            } else {
                doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1")
            };
            let layer = doc.get_page(page_index).get_layer(layer_index);

            for run in &page.runs {
                let font = if run.bold { &bold } else { &regular };
                // layout y grows downward from the top edge, PDF y grows upward
                let baseline = PAGE_HEIGHT_MM - run.y_mm - run.size_pt * PT_TO_MM;
                layer.use_text(
                    run.text.as_str(),
                    run.size_pt,
                    Mm(run.x_mm),
                    Mm(baseline),
                    font,
                );
            }
        }

        doc.save_to_bytes()
            .map_err(|e| ReportError::Encode(e.to_string()))
    }
}
