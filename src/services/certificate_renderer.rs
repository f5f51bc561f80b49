use std::fs;
use std::path::{Path, PathBuf};

use ab_glyph::{FontVec, PxScale};
use anyhow::{Context, Result};
use image::{ImageFormat, Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};

use crate::config::{CERTIFICATE_PUBLIC_PREFIX, Config};
use crate::entities::certificate;

const NUMBER_POSITION: (i32, i32) = (120, 90);
const NAME_BASELINE_Y: i32 = 620;
const TITLE_BASELINE_Y: i32 = 800;
const DATE_BASELINE_Y: i32 = 960;

const NUMBER_SCALE: f32 = 28.0;
const NAME_SCALE: f32 = 96.0;
const TITLE_SCALE: f32 = 56.0;
const DATE_SCALE: f32 = 36.0;

const NUMBER_COLOR: Rgba<u8> = Rgba([90, 90, 90, 255]);
const NAME_COLOR: Rgba<u8> = Rgba([24, 39, 71, 255]);
const TITLE_COLOR: Rgba<u8> = Rgba([40, 40, 40, 255]);
const DATE_COLOR: Rgba<u8> = Rgba([70, 70, 70, 255]);

/// Draws certificate fields onto a template image and writes the PNG.
#[derive(Debug, Clone)]
pub struct CertificateRenderer {
    pub template_path: PathBuf,
    pub font_path: PathBuf,
    pub output_dir: PathBuf,
    pub public_prefix: String,
}

impl CertificateRenderer {
    pub fn from_config(config: &Config) -> Self {
        Self {
            template_path: PathBuf::from(&config.certificate_template_path),
            font_path: PathBuf::from(&config.certificate_font_path),
            output_dir: PathBuf::from(&config.certificate_output_dir),
            public_prefix: CERTIFICATE_PUBLIC_PREFIX.to_string(),
        }
    }

    /// Renders and saves the certificate, returning its public path.
    pub fn render(
        &self,
        certificate: &certificate::Model,
        recipient_name: &str,
        training_title: &str,
    ) -> Result<String> {
        let mut canvas = image::open(&self.template_path)
            .with_context(|| {
                format!(
                    "Failed to load certificate template {}",
                    self.template_path.display()
                )
            })?
            .to_rgba8();

        let font = load_font(&self.font_path)?;
        let issued = certificate.issued_date.format("%d %B %Y").to_string();

        draw_text_mut(
            &mut canvas,
            NUMBER_COLOR,
            NUMBER_POSITION.0,
            NUMBER_POSITION.1,
            PxScale::from(NUMBER_SCALE),
            &font,
            &certificate.certificate_number,
        );
        draw_centered(&mut canvas, &font, NAME_SCALE, NAME_COLOR, NAME_BASELINE_Y, recipient_name);
        draw_centered(&mut canvas, &font, TITLE_SCALE, TITLE_COLOR, TITLE_BASELINE_Y, training_title);
        draw_centered(&mut canvas, &font, DATE_SCALE, DATE_COLOR, DATE_BASELINE_Y, &issued);

        fs::create_dir_all(&self.output_dir).with_context(|| {
            format!(
                "Failed to create certificate directory {}",
                self.output_dir.display()
            )
        })?;

        let file_name = certificate_file_name(&certificate.certificate_number);
        let output_path = self.output_dir.join(&file_name);
        canvas
            .save_with_format(&output_path, ImageFormat::Png)
            .with_context(|| format!("Failed to write {}", output_path.display()))?;

        tracing::info!(
            certificate_id = %certificate.id,
            path = %output_path.display(),
            "Certificate image rendered"
        );

        Ok(format!("{}/{}", self.public_prefix, file_name))
    }

    /// [`render`](Self::render) on the blocking pool.
    pub async fn render_async(
        &self,
        certificate: &certificate::Model,
        recipient_name: &str,
        training_title: &str,
    ) -> Result<String> {
        let renderer = self.clone();
        let certificate = certificate.clone();
        let recipient_name = recipient_name.to_string();
        let training_title = training_title.to_string();

        tokio::task::spawn_blocking(move || {
            renderer.render(&certificate, &recipient_name, &training_title)
        })
        .await
        .context("Certificate rendering task panicked")?
    }
}

fn load_font(path: &Path) -> Result<FontVec> {
    let bytes = fs::read(path)
        .with_context(|| format!("Failed to read certificate font {}", path.display()))?;
    FontVec::try_from_vec(bytes)
        .map_err(|e| anyhow::anyhow!("Invalid certificate font {}: {}", path.display(), e))
}

fn draw_centered(
    canvas: &mut RgbaImage,
    font: &FontVec,
    scale: f32,
    color: Rgba<u8>,
    y: i32,
    text: &str,
) {
    let scale = PxScale::from(scale);
    let (text_width, _) = text_size(scale, font, text);
    let x = (canvas.width() as i32 - text_width as i32) / 2;
    draw_text_mut(canvas, color, x.max(0), y, scale, font, text);
}

/// File name derived from the certificate number: `LMS/2026/10/18/0000000000042`
/// becomes `LMS-2026-10-18-0000000000042.png`.
pub fn certificate_file_name(certificate_number: &str) -> String {
    let stem: String = certificate_number
        .chars()
        .map(|c| match c {
            '/' => '-',
            c if c.is_ascii_alphanumeric() || c == '-' || c == '_' => c,
            _ => '_',
        })
        .collect();
    format!("{stem}.png")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::sea_orm_active_enums::CertificateStatus;
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    fn sample_certificate() -> certificate::Model {
        certificate::Model {
            id: Uuid::new_v4(),
            training_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            certificate_number: "LMS/2026/10/18/0000000000042".to_string(),
            issued_date: NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
            expiry_date: NaiveDate::from_ymd_opt(2031, 10, 18).unwrap(),
            final_score: 88,
            status: CertificateStatus::Active,
            image_path: None,
            created_at: Utc::now().naive_utc(),
        }
    }

    #[test]
    fn test_file_name_from_certificate_number() {
        assert_eq!(
            certificate_file_name("LMS/2026/10/18/0000000000042"),
            "LMS-2026-10-18-0000000000042.png"
        );
        assert_eq!(certificate_file_name("ACME CO/1"), "ACME_CO-1.png");
    }

    #[test]
    fn test_missing_template_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = CertificateRenderer {
            template_path: dir.path().join("missing.png"),
            font_path: dir.path().join("missing.ttf"),
            output_dir: dir.path().join("out"),
            public_prefix: CERTIFICATE_PUBLIC_PREFIX.to_string(),
        };

        let err = renderer
            .render(&sample_certificate(), "Ana Lima", "Rust for Backend Engineers")
            .unwrap_err();

        assert!(err.to_string().contains("certificate template"));
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn test_invalid_font_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let template_path = dir.path().join("template.png");
        RgbaImage::new(64, 64).save(&template_path).unwrap();
        let font_path = dir.path().join("font.ttf");
        fs::write(&font_path, b"not a font").unwrap();

        let renderer = CertificateRenderer {
            template_path,
            font_path,
            output_dir: dir.path().join("out"),
            public_prefix: CERTIFICATE_PUBLIC_PREFIX.to_string(),
        };

        let err = renderer
            .render(&sample_certificate(), "Ana Lima", "Rust for Backend Engineers")
            .unwrap_err();

        assert!(err.to_string().contains("Invalid certificate font"));
    }
}
