// ============================================================================
// Chart - Rendu raster des trois panneaux
// ============================================================================
// Produit une image PNG en mémoire :
// 1. Barres du résultat net des 3 derniers trimestres
// 2. Barres du chiffre d'affaires des 3 derniers trimestres
// 3. Courbes des moyennes trimestrielles des plus hauts / plus bas
//
// CONCEPTS PLOTTERS :
// 1. BitMapBackend::with_buffer : dessine dans un Vec<u8> RGB, pas sur disque
// 2. split_evenly : découpe la zone de dessin en panneaux
// 3. SegmentValue : axe X catégoriel (Q1, Q2, Q3 / 2024-Q1, ...)
// ============================================================================

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use plotters::coord::ranged1d::SegmentValue;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::full_palette::ORANGE;
use plotters::style::{register_font, FontStyle};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::format::CurrencyFormatter;
use crate::models::{QuarterlyAverage, QUARTERS};

/// Famille de police utilisée pour tout le texte du graphique
const FONT_FAMILY: &str = "sans-serif";

/// Polices système essayées quand aucune n'est configurée
const SYSTEM_FONTS: [&str; 6] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Erreurs du rendu graphique
#[derive(Debug, Error)]
pub enum ChartError {
    /// Échec de dessin (police absente, zone invalide...)
    #[error("échec du dessin du graphique : {0}")]
    Draw(String),

    /// Échec de l'encodage PNG
    #[error("échec de l'encodage PNG : {0}")]
    Encode(#[from] image::ImageError),

    /// Police illisible ou introuvable
    #[error("police inutilisable : {0}")]
    Font(String),

    /// Écriture du PNG sur disque
    #[error("échec de l'écriture de {path} : {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convertit n'importe quelle erreur plotters en ChartError::Draw
fn draw_err<E: std::fmt::Display>(err: E) -> ChartError {
    ChartError::Draw(err.to_string())
}

// ============================================================================
// Polices
// ============================================================================

/// Enregistre une police TTF/OTF pour le texte des graphiques
///
/// CONCEPT RUST : Box::leak
/// - plotters exige des octets &'static
/// - La police est chargée une seule fois au démarrage, fuite assumée
pub fn register_font_file(path: &Path) -> Result<(), ChartError> {
    let bytes = std::fs::read(path).map_err(|source| ChartError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());

    register_font(FONT_FAMILY, FontStyle::Normal, bytes)
        .map_err(|_| ChartError::Font(path.display().to_string()))?;

    info!(path = %path.display(), "Chart font registered");
    Ok(())
}

/// Enregistre la première police système trouvée
///
/// Retourne le chemin retenu, ou None si aucune n'est utilisable.
pub fn register_system_font() -> Option<PathBuf> {
    for candidate in SYSTEM_FONTS.iter().map(Path::new) {
        if !candidate.exists() {
            continue;
        }
        match register_font_file(candidate) {
            Ok(()) => return Some(candidate.to_path_buf()),
            Err(e) => warn!(path = %candidate.display(), error = %e, "Unusable system font"),
        }
    }
    warn!("No system font found, chart rendering will fail");
    None
}

// ============================================================================
// Types d'entrée / sortie
// ============================================================================

/// Données nécessaires au rendu
#[derive(Debug, Clone)]
pub struct ChartInput<'a> {
    /// Libellé du ticker dans les titres (ex: "RELIANCE.NS")
    pub ticker: &'a str,
    /// Résultat net, trimestre le plus récent en premier
    pub net_profit: &'a [Option<f64>; QUARTERS],
    /// Chiffre d'affaires, trimestre le plus récent en premier
    pub sales: &'a [Option<f64>; QUARTERS],
    /// Moyennes trimestrielles, ordre chronologique
    pub averages: &'a [QuarterlyAverage],
}

/// Image PNG encodée en mémoire
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartImage {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl ChartImage {
    /// Écrit le PNG dans `dir/<stem>.png` (crée le répertoire au besoin)
    pub fn save(&self, dir: &Path, stem: &str) -> Result<PathBuf, ChartError> {
        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source| ChartError::Io { path, source }
        };

        std::fs::create_dir_all(dir).map_err(io_err(dir))?;
        let path = dir.join(format!("{}.png", stem));
        std::fs::write(&path, &self.png).map_err(io_err(&path))?;

        debug!(path = %path.display(), bytes = self.png.len(), "Chart saved");
        Ok(path)
    }
}

/// Produit une image à partir des données d'un ticker
pub trait ChartRenderer {
    fn render(&self, input: &ChartInput<'_>) -> Result<ChartImage, ChartError>;
}

// ============================================================================
// Implémentation plotters
// ============================================================================

/// Rendu raster via plotters
#[derive(Debug, Clone)]
pub struct PlottersRenderer {
    width: u32,
    height: u32,
    formatter: CurrencyFormatter,
}

impl PlottersRenderer {
    pub fn new(width: u32, height: u32, formatter: CurrencyFormatter) -> Self {
        Self {
            width,
            height,
            formatter,
        }
    }

    /// Panneau à barres pour 3 trimestres (Q1 = le plus récent)
    fn draw_bars<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, plotters::coord::Shift>,
        title: &str,
        values: &[Option<f64>; QUARTERS],
        color: RGBColor,
    ) -> Result<(), ChartError>
    where
        DB::ErrorType: 'static,
    {
        let present: Vec<f64> = values.iter().flatten().copied().collect();
        let top = present.iter().copied().fold(0.0_f64, f64::max);
        let bottom = present.iter().copied().fold(0.0_f64, f64::min);
        // Marge haute pour les annotations, et une plage non nulle si tout vaut 0
        let span = (top - bottom).max(1.0);
        let y_range = (bottom - span * 0.05)..(top + span * 0.15);

        let mut chart = ChartBuilder::on(area)
            .caption(title, (FONT_FAMILY, 22))
            .margin(12)
            .x_label_area_size(35)
            .y_label_area_size(90)
            .build_cartesian_2d((0u32..QUARTERS as u32).into_segmented(), y_range)
            .map_err(draw_err)?;

        let formatter = &self.formatter;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .y_desc(formatter.symbol())
            .x_label_formatter(&|x| match x {
                SegmentValue::CenterOf(i) => format!("Q{}", i + 1),
                _ => String::new(),
            })
            .y_label_formatter(&|y| formatter.format(Some(*y)))
            .label_style((FONT_FAMILY, 14))
            .draw()
            .map_err(draw_err)?;

        chart
            .draw_series(
                Histogram::vertical(&chart)
                    .style(color.filled())
                    .margin(25)
                    .data(
                        values
                            .iter()
                            .enumerate()
                            .filter_map(|(i, v)| v.map(|v| (i as u32, v))),
                    ),
            )
            .map_err(draw_err)?;

        let label_style = TextStyle::from((FONT_FAMILY, 14).into_font())
            .pos(Pos::new(HPos::Center, VPos::Bottom));
        chart
            .draw_series(values.iter().enumerate().map(|(i, v)| {
                let y = v.unwrap_or(0.0).max(0.0);
                Text::new(
                    formatter.format(*v),
                    (SegmentValue::CenterOf(i as u32), y),
                    label_style.clone(),
                )
            }))
            .map_err(draw_err)?;

        Ok(())
    }

    /// Panneau des moyennes trimestrielles High / Low
    fn draw_high_low<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, plotters::coord::Shift>,
        title: &str,
        averages: &[QuarterlyAverage],
    ) -> Result<(), ChartError>
    where
        DB::ErrorType: 'static,
    {
        let count = averages.len().max(1) as u32;
        let (low, high) = averages.iter().fold((f64::MAX, f64::MIN), |(lo, hi), avg| {
            (lo.min(avg.low), hi.max(avg.high))
        });
        let (low, high) = if averages.is_empty() { (0.0, 1.0) } else { (low, high) };
        let margin = ((high - low) * 0.1).max(1.0);

        let mut chart = ChartBuilder::on(area)
            .caption(title, (FONT_FAMILY, 22))
            .margin(12)
            .x_label_area_size(35)
            .y_label_area_size(90)
            .build_cartesian_2d((0u32..count).into_segmented(), (low - margin)..(high + margin))
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .y_desc(self.formatter.symbol())
            .x_label_formatter(&|x| match x {
                SegmentValue::CenterOf(i) => averages
                    .get(*i as usize)
                    .map(QuarterlyAverage::label)
                    .unwrap_or_default(),
                _ => String::new(),
            })
            .label_style((FONT_FAMILY, 14))
            .draw()
            .map_err(draw_err)?;

        let point = |i: usize, y: f64| (SegmentValue::CenterOf(i as u32), y);
        let highs: Vec<_> = averages.iter().enumerate().map(|(i, a)| point(i, a.high)).collect();
        let lows: Vec<_> = averages.iter().enumerate().map(|(i, a)| point(i, a.low)).collect();

        chart
            .draw_series(LineSeries::new(highs.clone(), GREEN.stroke_width(2)))
            .map_err(draw_err)?
            .label("High")
            .legend(|(x, y)| Circle::new((x + 10, y), 5, GREEN.filled()));
        chart
            .draw_series(highs.into_iter().map(|p| Circle::new(p, 5, GREEN.filled())))
            .map_err(draw_err)?;

        chart
            .draw_series(LineSeries::new(lows.clone(), RED.stroke_width(2)))
            .map_err(draw_err)?
            .label("Low")
            .legend(|(x, y)| TriangleMarker::new((x + 10, y), 6, RED.filled()));
        chart
            .draw_series(lows.into_iter().map(|p| TriangleMarker::new(p, 6, RED.filled())))
            .map_err(draw_err)?;

        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .label_font((FONT_FAMILY, 14))
            .draw()
            .map_err(draw_err)?;

        Ok(())
    }
}

impl ChartRenderer for PlottersRenderer {
    fn render(&self, input: &ChartInput<'_>) -> Result<ChartImage, ChartError> {
        let (width, height) = (self.width, self.height);
        let mut buffer = vec![0u8; width as usize * height as usize * 3];

        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(draw_err)?;

            let panels = root.split_evenly((3, 1));
            self.draw_bars(
                &panels[0],
                &format!("{} - Net Profit (Last 3 Quarters)", input.ticker),
                input.net_profit,
                BLUE,
            )?;
            self.draw_bars(
                &panels[1],
                &format!("{} - Sales (Last 3 Quarters)", input.ticker),
                input.sales,
                ORANGE,
            )?;
            self.draw_high_low(
                &panels[2],
                &format!("{} - 52-Week High/Low Averages by Quarter", input.ticker),
                input.averages,
            )?;

            root.present().map_err(draw_err)?;
        }

        let mut png = Vec::new();
        PngEncoder::new(Cursor::new(&mut png)).write_image(
            &buffer,
            width,
            height,
            ExtendedColorType::Rgb8,
        )?;

        debug!(width, height, bytes = png.len(), "Chart rendered");
        Ok(ChartImage { png, width, height })
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
