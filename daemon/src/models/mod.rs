macro_rules! import_models {
    ($x:ident) => {
        mod $x;
        pub use self::$x::*;
    };
}

import_models!(maintainer);
import_models!(group);
import_models!(source);
import_models!(binary);
import_models!(check);
import_models!(builder);
import_models!(job);
import_models!(result);
