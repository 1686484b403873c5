//! Preguntas interactivas por consola

use std::io::{BufRead, Write};

use crate::device::{Gy85Error, Gy85Result};

/// Muestra `question` y lee una línea no vacía
pub fn prompt_line<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
) -> Gy85Result<String> {
    write!(output, "{}", question)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(Gy85Error::InvalidInput("fin de la entrada".into()));
    }
    let value = line.trim();
    if value.is_empty() {
        return Err(Gy85Error::InvalidInput(format!(
            "respuesta vacía para '{}'",
            question.trim()
        )));
    }
    Ok(value.to_owned())
}

/// Muestra `question` y lee un número entero positivo
pub fn prompt_count<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
) -> Gy85Result<u32> {
    let answer = prompt_line(input, output, question)?;
    parse_count(&answer)
}

pub fn parse_count(text: &str) -> Gy85Result<u32> {
    match text.trim().parse::<u32>() {
        Ok(0) => Err(Gy85Error::InvalidInput("el número debe ser mayor que cero".into())),
        Ok(n) => Ok(n),
        Err(_) => Err(Gy85Error::InvalidInput(format!("'{}' no es un número válido", text.trim()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_trimmed_line() {
        let mut input = Cursor::new("  swipe_left \n");
        let mut output = Vec::new();
        let name = prompt_line(&mut input, &mut output, "Gesto: ").unwrap();
        assert_eq!(name, "swipe_left");
        assert_eq!(output, b"Gesto: ");
    }

    #[test]
    fn sequential_prompts_share_input() {
        let mut input = Cursor::new("ana\nwave\n3\n");
        let mut output = Vec::new();
        assert_eq!(prompt_line(&mut input, &mut output, "? ").unwrap(), "ana");
        assert_eq!(prompt_line(&mut input, &mut output, "? ").unwrap(), "wave");
        assert_eq!(prompt_count(&mut input, &mut output, "? ").unwrap(), 3);
    }

    #[test]
    fn non_numeric_count_is_an_error() {
        assert!(matches!(parse_count("five"), Err(Gy85Error::InvalidInput(_))));
        assert!(parse_count("0").is_err());
        assert!(parse_count("-2").is_err());
        assert_eq!(parse_count(" 12 ").unwrap(), 12);
    }

    #[test]
    fn eof_and_empty_are_errors() {
        let mut output = Vec::new();
        assert!(prompt_line(&mut Cursor::new(""), &mut output, "? ").is_err());
        assert!(prompt_line(&mut Cursor::new("\n"), &mut output, "? ").is_err());
    }
}
