//! Synchronous card generation.

use bytes::Bytes;
use std::sync::Arc;
use tracing::debug;

use card_common::{CardError, CardResult, Field, FieldValues, Template, TemplateRegistry};
use renderer::encode::{encode, flatten_to_rgb, OutputFormat};
use renderer::fonts::FontCache;
use renderer::overlay::{apply_overlay, load_rgba};
use renderer::{place_at_anchor, render_text};

/// Renders cards from a loaded template registry.
///
/// Holds only read-only state plus the font cache, so one instance can be
/// shared across threads.
pub struct Generator {
    registry: Arc<TemplateRegistry>,
    fonts: FontCache,
}

impl Generator {
    pub fn new(registry: Arc<TemplateRegistry>) -> Self {
        let fonts = FontCache::new(registry.fonts().clone(), registry.dpi());
        Self { registry, fonts }
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    pub fn fonts(&self) -> &FontCache {
        &self.fonts
    }

    /// Generate a PNG card.
    pub fn generate(&self, template_key: &str, values: &FieldValues) -> CardResult<Bytes> {
        self.generate_with_format(template_key, values, OutputFormat::Png)
    }

    /// Generate a card in `format`.
    ///
    /// Every precondition (template, field values, base image) is checked
    /// before any drawing; on error no bytes are produced.
    pub fn generate_with_format(
        &self,
        template_key: &str,
        values: &FieldValues,
        format: OutputFormat,
    ) -> CardResult<Bytes> {
        let template = self
            .registry
            .get(template_key)
            .ok_or_else(|| CardError::UnknownTemplate(template_key.to_string()))?;

        let texts = field_texts(template, values)?;

        let mut canvas =
            load_rgba(&template.base_image).map_err(|reason| CardError::BaseImageMissing {
                path: template.base_image.clone(),
                reason,
            })?;

        let color = self.registry.text_color();
        for (field, text) in texts {
            let resolved = self.fonts.resolve(&field.font, field.size_pt);
            let layer = render_text(text, &resolved.font, color);
            debug!(
                template = %template.key,
                field = %field.name,
                layer_width = layer.width(),
                layer_height = layer.height(),
                fallback_font = resolved.is_fallback(),
                "Placing field"
            );
            place_at_anchor(&mut canvas, &layer, field.anchor, field.angle_deg);
        }

        if let Some(overlay) = &template.overlay {
            apply_overlay(&mut canvas, overlay)?;
        }

        let rgb = flatten_to_rgb(canvas);
        Ok(Bytes::from(encode(&rgb, format)?))
    }
}

/// Pair each declared field with its supplied text, in declaration order.
fn field_texts<'a>(
    template: &'a Template,
    values: &'a FieldValues,
) -> CardResult<Vec<(&'a Field, &'a str)>> {
    template
        .fields
        .iter()
        .map(|field| {
            values
                .get(&field.name)
                .map(|text| (field, text.as_str()))
                .ok_or_else(|| CardError::MissingFieldValue {
                    template: template.key.clone(),
                    field: field.name,
                })
        })
        .collect()
}
