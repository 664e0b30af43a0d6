//! Minimal deterministic PDF 1.4 writer.
//!
//! Serializes laid-out pages through `std::io::Write`: text runs in the
//! builtin Helvetica faces and filled rectangles, no font embedding. Layout
//! coordinates are top-down millimetres; PDF user space is bottom-up points.

// Page geometry in millimetres; not monetary math.
#![allow(clippy::float_arithmetic)]

use std::io::Write;

use super::layout::{Color, Element, FontFace, PAGE_HEIGHT, PAGE_WIDTH, Page};

const PT_PER_MM: f64 = 72.0 / 25.4;

/// Serializes the page list as a complete PDF document.
pub(crate) fn render(pages: &[Page], writer: &mut impl Write) -> std::io::Result<()> {
    // Object layout: 1 catalog, 2 page tree, 3-5 fonts, then one
    // (page, content stream) pair per laid-out page.
    let object_count = 5 + 2 * pages.len();
    let mut offsets: Vec<usize> = vec![0; object_count + 1];
    let mut buffer: Vec<u8> = Vec::new();

    buffer.extend_from_slice(b"%PDF-1.4\n");

    begin_object(&mut buffer, &mut offsets, 1);
    buffer.extend_from_slice(b"<< /Type /Catalog /Pages 2 0 R >>\nendobj\n");

    begin_object(&mut buffer, &mut offsets, 2);
    let kids = (0..pages.len())
        .map(|i| format!("{} 0 R", 6 + 2 * i))
        .collect::<Vec<_>>()
        .join(" ");
    write!(
        buffer,
        "<< /Type /Pages /Kids [{kids}] /Count {} >>\nendobj\n",
        pages.len()
    )?;

    for (id, base_font) in [
        (3, "Helvetica"),
        (4, "Helvetica-Bold"),
        (5, "Helvetica-Oblique"),
    ] {
        begin_object(&mut buffer, &mut offsets, id);
        write!(
            buffer,
            "<< /Type /Font /Subtype /Type1 /BaseFont /{base_font} /Encoding /WinAnsiEncoding >>\nendobj\n"
        )?;
    }

    let media_width = PAGE_WIDTH * PT_PER_MM;
    let media_height = PAGE_HEIGHT * PT_PER_MM;

    for (index, page) in pages.iter().enumerate() {
        let page_id = 6 + 2 * index;
        let content_id = page_id + 1;

        begin_object(&mut buffer, &mut offsets, page_id);
        write!(
            buffer,
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {media_width:.2} {media_height:.2}] /Resources << /Font << /F1 3 0 R /F2 4 0 R /F3 5 0 R >> >> /Contents {content_id} 0 R >>\nendobj\n"
        )?;

        let content = content_stream(page)?;
        begin_object(&mut buffer, &mut offsets, content_id);
        write!(buffer, "<< /Length {} >>\nstream\n", content.len())?;
        buffer.extend_from_slice(&content);
        buffer.extend_from_slice(b"endstream\nendobj\n");
    }

    let xref_offset = buffer.len();
    write!(buffer, "xref\n0 {}\n", object_count + 1)?;
    buffer.extend_from_slice(b"0000000000 65535 f \n");
    for id in 1..=object_count {
        write!(buffer, "{:010} 00000 n \n", offsets[id])?;
    }
    write!(
        buffer,
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
        object_count + 1
    )?;

    writer.write_all(&buffer)
}

fn begin_object(buffer: &mut Vec<u8>, offsets: &mut [usize], id: usize) {
    offsets[id] = buffer.len();
    buffer.extend_from_slice(format!("{id} 0 obj\n").as_bytes());
}

fn content_stream(page: &Page) -> std::io::Result<Vec<u8>> {
    let mut content: Vec<u8> = Vec::new();

    for element in &page.elements {
        match element {
            Element::Rect(rect) => {
                let x = rect.x * PT_PER_MM;
                let y = (PAGE_HEIGHT - rect.y - rect.height) * PT_PER_MM;
                let width = rect.width * PT_PER_MM;
                let height = rect.height * PT_PER_MM;
                writeln!(content, "{}", fill_color(rect.color))?;
                writeln!(content, "{x:.2} {y:.2} {width:.2} {height:.2} re\nf")?;
            }
            Element::Text(text) => {
                let x = text.x * PT_PER_MM;
                let y = (PAGE_HEIGHT - text.y) * PT_PER_MM;
                let font = match text.face {
                    FontFace::Regular => "F1",
                    FontFace::Bold => "F2",
                    FontFace::Italic => "F3",
                };
                writeln!(content, "BT")?;
                writeln!(content, "/{font} {:.1} Tf", text.size)?;
                writeln!(content, "{}", fill_color(text.color))?;
                writeln!(content, "{x:.2} {y:.2} Td")?;
                content.push(b'(');
                content.extend_from_slice(&encode_text(&text.text));
                content.extend_from_slice(b") Tj\nET\n");
            }
        }
    }

    Ok(content)
}

fn fill_color(color: Color) -> String {
    format!(
        "{:.3} {:.3} {:.3} rg",
        f64::from(color.r) / 255.0,
        f64::from(color.g) / 255.0,
        f64::from(color.b) / 255.0
    )
}

/// Encodes a text run as a WinAnsi PDF string literal body.
fn encode_text(text: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '(' => bytes.extend_from_slice(b"\\("),
            ')' => bytes.extend_from_slice(b"\\)"),
            '\\' => bytes.extend_from_slice(b"\\\\"),
            // Euro sign sits at 0x80 in WinAnsiEncoding.
            '\u{20ac}' => bytes.push(0x80),
            c if c.is_ascii() => bytes.push(c as u8),
            c if (0xa0..=0xff).contains(&(c as u32)) => bytes.push(c as u8),
            _ => bytes.push(b'?'),
        }
    }
    bytes
}
