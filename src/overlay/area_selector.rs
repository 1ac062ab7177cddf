// screen-translator/src/overlay/area_selector.rs

// ============================================================================
// SELEÇÃO VISUAL DA ÁREA DE CAPTURA
// ============================================================================
//
// A janela principal vira tela cheia com um screenshot de fundo; o usuário
// clica e arrasta. Soltar o mouse devolve a região (em pixels da tela),
// ESC cancela. Seleções menores que 5x5 pixels contam como cancelamento.
//
// ============================================================================

use anyhow::Result;
use eframe::egui;

use crate::region::CaptureRegion;
use crate::screenshot;

/// Menor lado aceito para a seleção
pub const MIN_SELECTION_SIDE: u32 = 5;

/// Estado da seleção depois de um frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionStatus {
    Selecting,
    /// `None` = cancelada
    Finished(Option<CaptureRegion>),
}

pub struct AreaSelector {
    /// Screenshot de fundo
    background: egui::TextureHandle,
    /// Tamanho do screenshot em pixels
    image_size: [usize; 2],
    /// Posição inicial do clique
    start_pos: Option<egui::Pos2>,
    /// Posição atual do mouse
    current_pos: Option<egui::Pos2>,
}

impl AreaSelector {
    /// Captura a tela e coloca a janela em tela cheia
    pub fn open(ctx: &egui::Context) -> Result<Self> {
        info!("📸 Capturando tela de fundo para seleção...");

        let screen = screenshot::capture_screen_to_memory()?.to_rgba8();
        let image_size = [screen.width() as usize, screen.height() as usize];
        let image = egui::ColorImage::from_rgba_unmultiplied(image_size, screen.as_raw());
        let background = ctx.load_texture("area_selector_background", image, egui::TextureOptions::LINEAR);

        ctx.send_viewport_cmd(egui::ViewportCommand::Fullscreen(true));

        Ok(AreaSelector {
            background,
            image_size,
            start_pos: None,
            current_pos: None,
        })
    }

    fn current_rect(&self) -> Option<egui::Rect> {
        Some(egui::Rect::from_two_pos(self.start_pos?, self.current_pos?))
    }

    /// Desenha um frame da seleção
    pub fn show(&mut self, ctx: &egui::Context) -> SelectionStatus {
        let mut status = SelectionStatus::Selecting;

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                let canvas = ui.max_rect();
                let painter = ui.painter();

                // Fundo escurecido
                painter.image(
                    self.background.id(),
                    canvas,
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    egui::Color32::WHITE,
                );
                painter.rect_filled(canvas, 0.0, egui::Color32::from_rgba_unmultiplied(0, 0, 0, 100));

                painter.text(
                    canvas.min + egui::vec2(20.0, 30.0),
                    egui::Align2::LEFT_TOP,
                    "🎯 SELEÇÃO DE ÁREA",
                    egui::FontId::proportional(24.0),
                    egui::Color32::WHITE,
                );
                painter.text(
                    canvas.min + egui::vec2(20.0, 60.0),
                    egui::Align2::LEFT_TOP,
                    "Clique e arraste sobre o texto a traduzir  •  ESC cancela",
                    egui::FontId::proportional(16.0),
                    egui::Color32::LIGHT_GRAY,
                );

                let response = ui.interact(
                    canvas,
                    egui::Id::new("area_selector"),
                    egui::Sense::click_and_drag(),
                );

                if response.drag_started() {
                    if let Some(pos) = response.interact_pointer_pos() {
                        self.start_pos = Some(pos);
                        self.current_pos = Some(pos);
                    }
                }

                if response.dragged() {
                    if let Some(pos) = response.interact_pointer_pos() {
                        self.current_pos = Some(pos);
                    }
                }

                if let Some(rect) = self.current_rect() {
                    ui.painter().rect_filled(
                        rect,
                        0.0,
                        egui::Color32::from_rgba_unmultiplied(0, 150, 255, 50),
                    );
                    ui.painter().rect_stroke(
                        rect,
                        0.0,
                        egui::Stroke::new(3.0, egui::Color32::from_rgb(0, 122, 204)),
                    );

                    if let Some(region) = rect_to_region(rect, canvas, self.image_size) {
                        ui.painter().text(
                            rect.center(),
                            egui::Align2::CENTER_CENTER,
                            format!("{}x{}", region.width, region.height),
                            egui::FontId::proportional(20.0),
                            egui::Color32::WHITE,
                        );
                    }
                }

                if response.drag_stopped() {
                    let region = self
                        .current_rect()
                        .and_then(|rect| rect_to_region(rect, canvas, self.image_size));
                    if region.is_none() {
                        info!("❌ Seleção pequena demais, ignorada");
                    }
                    status = SelectionStatus::Finished(region);
                }
            });

        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            info!("❌ Seleção cancelada");
            status = SelectionStatus::Finished(None);
        }

        if status != SelectionStatus::Selecting {
            ctx.send_viewport_cmd(egui::ViewportCommand::Fullscreen(false));
        }

        status
    }
}

/// Converte o retângulo desenhado (pontos da UI) em pixels do screenshot.
/// A escala compensa DPI: o screenshot cobre o canvas inteiro.
pub fn rect_to_region(
    rect: egui::Rect,
    canvas: egui::Rect,
    image_size: [usize; 2],
) -> Option<CaptureRegion> {
    if canvas.width() <= 0.0 || canvas.height() <= 0.0 {
        return None;
    }

    let [image_width, image_height] = image_size.map(|side| side as f32);
    let scale_x = image_width / canvas.width();
    let scale_y = image_height / canvas.height();

    let clipped = rect.intersect(canvas);
    let left = ((clipped.min.x - canvas.min.x) * scale_x).round().max(0.0);
    let top = ((clipped.min.y - canvas.min.y) * scale_y).round().max(0.0);
    let right = ((clipped.max.x - canvas.min.x) * scale_x).round().min(image_width);
    let bottom = ((clipped.max.y - canvas.min.y) * scale_y).round().min(image_height);

    if right - left < MIN_SELECTION_SIDE as f32 || bottom - top < MIN_SELECTION_SIDE as f32 {
        return None;
    }

    CaptureRegion::new(
        left as u32,
        top as u32,
        (right - left) as u32,
        (bottom - top) as u32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> egui::Rect {
        egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(960.0, 540.0))
    }

    #[test]
    fn points_are_scaled_to_screen_pixels() {
        // Tela 1920x1080 exibida num canvas de 960x540 (DPI 200%)
        let rect = egui::Rect::from_two_pos(egui::pos2(100.0, 50.0), egui::pos2(10.0, 30.0));
        let region = rect_to_region(rect, canvas(), [1920, 1080]).unwrap();

        assert_eq!(region, CaptureRegion::new(20, 60, 180, 40).unwrap());
    }

    #[test]
    fn tiny_selection_is_cancelled() {
        let rect = egui::Rect::from_min_size(egui::pos2(10.0, 10.0), egui::vec2(4.0, 40.0));
        assert!(rect_to_region(rect, canvas(), [960, 540]).is_none());

        let click = egui::Rect::from_two_pos(egui::pos2(10.0, 10.0), egui::pos2(10.0, 10.0));
        assert!(rect_to_region(click, canvas(), [960, 540]).is_none());
    }

    #[test]
    fn selection_is_clipped_to_the_screen() {
        let rect = egui::Rect::from_two_pos(egui::pos2(900.0, 500.0), egui::pos2(2000.0, 2000.0));
        let region = rect_to_region(rect, canvas(), [960, 540]).unwrap();

        assert_eq!(region, CaptureRegion::new(900, 500, 60, 40).unwrap());
        assert!(region.fits_within(960, 540));
    }
}
