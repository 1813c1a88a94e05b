//! Token listing output.

use quick_syntax::{format_tokens, tokenize};

#[test]
fn listing_of_small_program() {
    let tokens = tokenize("var x: real;\nx = 1.5 >= 2;\n").expect("tokenize");
    let expected = "\
1\tVAR
1\tID: x
1\tCOLON
1\tREAL
1\tSEMICOLON
2\tID: x
2\tASSIGN
2\tREAL: 1.500000
2\tGREATEREQ
2\tINT: 2
2\tSEMICOLON
3\tFINISH
";
    assert_eq!(format_tokens(&tokens), expected);
}

#[test]
fn listing_has_one_line_per_token() {
    let tokens = tokenize("f(a, \"b c\", 3);").expect("tokenize");
    let listing = format_tokens(&tokens);
    assert_eq!(listing.lines().count(), tokens.len());
    assert!(listing.contains("1\tSTR: b c\n"));
}

#[test]
fn listing_of_empty_stream() {
    assert_eq!(format_tokens(&[]), "");
}
