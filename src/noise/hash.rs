//! Seeded lattice hashing and the fixed gradient table
//!
//! Every function here is a pure function of its arguments. All integer
//! arithmetic wraps on 32-bit signed overflow so results are identical on
//! every platform.

use glam::Vec2;

const X_PRIME: i32 = 1619;
const Y_PRIME: i32 = 31337;
const VALUE_MULTIPLIER: i32 = 60493;

// ============================================================================
// GRADIENT TABLE
// ============================================================================
// 256 unit vectors spaced by the golden angle, so neighbouring hash values
// point in unrelated directions. This table must remain unchanged to keep
// point fields stable across versions.
const GRADIENTS: [[f32; 2]; 256] = [
    [1.00000000, 0.00000000], [-0.73736888, 0.67549029], [0.08742572, -0.99617104],
    [0.60843886, 0.79360075], [-0.98471349, -0.17418195], [0.84375529, -0.53672805],
    [-0.25960430, 0.96571507], [-0.46090702, -0.88744843], [0.93932130, 0.34303863],
    [-0.92434556, 0.38155641], [0.42384600, -0.90573427], [0.29928386, 0.95416412],
    [-0.86521121, -0.50140758], [0.97667577, -0.21471943], [-0.57512943, 0.81806243],
    [-0.12851069, -0.99170812], [0.76464900, 0.64444698], [-0.99914605, 0.04131783],
    [0.70882941, -0.70537994], [-0.04619145, 0.99893261], [-0.64070914, -0.76778369],
    [0.99106941, 0.13334699], [-0.82085834, 0.57113185], [0.21948137, -0.97561669],
    [0.49718087, 0.86764692], [-0.95269278, -0.30393498], [0.90779113, -0.41942253],
    [-0.38606108, 0.92247322], [-0.33845228, -0.94098356], [0.88518944, 0.46523076],
    [-0.96697001, 0.25489019], [0.54083774, -0.84112695], [0.16937617, 0.98555148],
    [-0.79062317, -0.61230303], [0.99658567, -0.08256509], [-0.67907935, 0.73406488],
    [0.00487828, -0.99998810], [0.67188517, 0.74065533], [-0.99573270, -0.09228428],
    [0.79655944, -0.60456022], [-0.17898358, 0.98385206], [-0.53260559, -0.84636356],
    [0.96443716, 0.26431224], [-0.88968630, 0.45657232], [0.34761682, -0.93763668],
    [0.37704265, 0.92619590], [-0.90365586, -0.42825937], [0.95561276, -0.29462563],
    [-0.50562236, 0.86275491], [-0.20995238, -0.97771161], [0.81524706, 0.57911332],
    [-0.99232323, 0.12367133], [0.64816948, -0.76149611], [0.03644322, 0.99933573],
    [-0.70191368, -0.71226202], [0.99869538, 0.05106397], [-0.77090011, 0.63695606],
    [0.13818011, -0.99040712], [0.56712068, 0.82363471], [-0.97453439, -0.22423809],
    [0.87006198, -0.49294234], [-0.30857886, 0.95119876], [-0.41498908, -0.90982639],
    [0.92057893, 0.39055657], [-0.94262342, 0.33385787], [0.46954342, -0.88290938],
    [0.25017001, 0.96820192], [-0.83847858, -0.54493455], [0.98636601, -0.16456636],
    [-0.61615262, 0.78762678], [-0.07770248, -0.99697659], [0.73074340, 0.68265224],
    [-0.99995240, -0.00975644], [0.74392416, -0.66826405], [-0.09714064, 0.99527066],
    [-0.60066719, -0.79949918], [0.98296722, 0.18378096], [-0.84895169, 0.52847046],
    [0.26901389, -0.96313630], [0.45222675, 0.89190300], [-0.93592975, -0.35218673],
    [0.92802419, -0.37251993], [-0.43266256, 0.90155594], [-0.28996038, -0.95703865],
    [0.86027808, 0.50982510], [-0.97872419, 0.20518033], [0.58308343, -0.81241228],
    [0.11882903, 0.99291473], [-0.75832509, -0.65187656], [0.99950161, -0.03156775],
    [-0.71567767, 0.69843072], [0.05593527, -0.99843440], [0.63318782, 0.77399818],
    [-0.98972125, -0.14300995], [0.82639148, -0.56309601], [-0.22898947, 0.97342890],
    [-0.48869207, -0.87245634], [0.94968211, 0.31321540], [-0.91184000, 0.41054576],
    [0.39504276, -0.91866273], [0.32925552, 0.94424086], [-0.88060831, -0.47384491],
    [0.96941080, -0.24544388], [-0.54901840, 0.83581026], [-0.15975264, -0.98715708],
    [0.78461165, 0.61998755], [-0.99734378, 0.07283803], [0.68620888, -0.72740454],
    [-0.01463437, 0.99989291], [-0.66462703, -0.74717529], [0.99478494, 0.10199470],
    [-0.80241988, 0.59675986], [0.18857396, -0.98205899], [0.52432275, 0.85151961],
    [-0.96181251, -0.27370913], [0.89409848, -0.44787042], [-0.35674827, 0.93420055],
    [-0.36798834, -0.92983041], [0.89943456, 0.43705545], [-0.95844177, 0.28528823],
    [0.51401570, -0.85778077], [0.20040340, 0.97971347], [-0.80955817, -0.58703967],
    [0.99348260, -0.11398391], [-0.65556812, 0.75513604], [-0.02669153, -0.99964372],
    [0.69493113, 0.71907630], [-0.99814965, -0.06080525], [0.77707784, -0.62940450],
    [-0.14783638, 0.98901183], [-0.55905795, -0.82912859], [0.97230024, 0.23373540],
    [-0.87482993, 0.48443017], [0.31784449, -0.94814286], [0.40609267, 0.91383190],
    [-0.91672467, -0.39951955], [0.94583582, -0.32464534], [-0.47813513, 0.87828629],
    [-0.24071190, -0.97059661], [0.83312205, 0.55308918], [-0.98792465, 0.15493511],
    [0.62380773, -0.78157784], [0.06797184, 0.99768724], [-0.72404837, -0.68974920],
    [0.99980962, 0.01951195], [-0.75040863, 0.66097419], [0.10684632, -0.99427555],
    [0.59283833, 0.80532150], [-0.98112739, -0.19336247], [0.85406727, -0.52016256],
    [-0.27839786, 0.96046584], [-0.44350343, -0.89627267], [0.93244912, 0.36130131],
    [-0.93161449, 0.36344799], [0.44143794, -0.89729178], [0.28060929, 0.95982208],
    [-0.85526306, -0.51819408], [0.98067943, -0.19562170], [-0.59098193, 0.80668480],
    [-0.10913607, -0.99402682], [0.75192901, 0.65924409], [-0.99976203, 0.02181467],
    [0.72245781, -0.69141501], [-0.06567377, 0.99784115], [-0.62560621, -0.78013900],
    [0.98827888, 0.15265930], [-0.83184596, 0.55500658], [0.23847577, -0.97114845],
    [0.48015674, 0.87718271], [-0.94658104, -0.32246601], [0.91580206, -0.40162991],
    [-0.40398683, 0.91476480], [-0.32002742, -0.94740828], [0.87594336, 0.48241396],
    [-0.97175932, 0.23597420], [0.55714680, -0.83041402], [0.15011390, 0.98866871],
    [-0.77852543, -0.62761306], [0.99800695, -0.06310404], [-0.69327310, 0.72067497],
    [0.02438906, -0.99970254], [0.65730563, 0.75362412], [-0.99374249, -0.11169540],
    [0.80820394, -0.58890270], [-0.19814638, 0.98017244], [-0.51599000, -0.85659461],
    [0.95909631, 0.28307997], [-0.89842554, 0.43912589], [0.36584576, -0.93067550],
    [0.35889899, 0.93337641], [-0.89512765, -0.44580993], [0.96117955, -0.27592367],
    [-0.52236013, 0.85272498], [-0.19083535, -0.98162206], [0.80379222, 0.59491013],
    [-0.99454739, 0.10428563], [0.66290436, -0.74870409], [0.01693730, 0.99985655],
    [-0.68788243, -0.72582212], [0.99750890, 0.07054074], [-0.78318160, 0.62179304],
    [0.15747858, -0.98752240], [0.55094200, 0.83454354], [-0.96997354, -0.24321046],
    [0.87951461, -0.47587189], [-0.32707986, 0.94499670], [-0.39715759, -0.91775043],
    [0.91278315, 0.40844450], [-0.94895819, 0.31540190], [0.48668132, -0.87357959],
    [0.23123088, 0.97289891], [-0.82768622, -0.56119116], [0.98938924, -0.14528911],
    [-0.63140345, 0.77545450], [-0.05823473, -0.99830292], [0.71728441, 0.69678050],
    [-0.99957167, -0.02926560], [0.75682167, -0.65362142], [-0.11654182, 0.99318579],
    [-0.58495305, -0.81106716], [0.97919416, 0.20292557], [-0.85910156, 0.51180515],
    [0.28775534, -0.95770395], [0.43473789, 0.90055703], [-0.92887973, -0.37038150],
    [0.93511611, -0.35434145], [-0.45017131, 0.89294221], [-0.27123149, -0.96251415],
    [0.85016662, 0.52651374], [-0.98254133, 0.18604446], [0.59882417, -0.80088052],
    [0.09943271, 0.99504429], [-0.74546135, -0.66654886], [0.99992728, -0.01205952],
    [-0.72916917, 0.68433349], [0.07540602, -0.99715291], [0.61796506, 0.78620556],
    [-0.98674243, -0.16229411], [0.83722126, -0.54686431], [-0.24793937, 0.96877555],
    [-0.47157571, -0.88182558], [0.94338987, 0.33168592], [-0.91967695, 0.39267583],
    [0.41289245, -0.91077979], [0.31076886, 0.95048552], [-0.87119503, -0.49093709],
    [0.97401534, -0.22648206], [-0.56522217, 0.82493873], [-0.14046087, -0.99008623],
    [0.77236511, 0.63517882], [-0.99857512, 0.05336404], [0.70027133, -0.71387679],
    [-0.03414144, 0.99941701], [-0.64992166, -0.76000121], [0.99260544, 0.12138547],
    [-0.81391107, 0.58098948],
];

#[inline]
fn seed_lattice(seed: i32, x: i32, y: i32) -> i32 {
    seed ^ X_PRIME.wrapping_mul(x) ^ Y_PRIME.wrapping_mul(y)
}

/// 32-bit lattice hash of a cell index
///
/// # Algorithm
/// 1. XOR the seed with both coordinates multiplied by large odd primes
/// 2. Cube the result and scale by a third constant
/// 3. Fold the high bits down with an arithmetic shift
#[inline]
pub fn hash_2d(seed: i32, x: i32, y: i32) -> i32 {
    let n = seed_lattice(seed, x, y);
    let hash = n
        .wrapping_mul(n)
        .wrapping_mul(n)
        .wrapping_mul(VALUE_MULTIPLIER);
    (hash >> 13) ^ hash
}

/// Scalar value of a cell in [-1, 1)
#[inline]
pub fn value_2d(seed: i32, x: i32, y: i32) -> f32 {
    let n = seed_lattice(seed, x, y);
    let cubed = n
        .wrapping_mul(n)
        .wrapping_mul(n)
        .wrapping_mul(VALUE_MULTIPLIER);
    cubed as f32 / 2_147_483_648.0
}

/// Map a value in [-1, 1] to [0, 1]
#[inline]
pub fn to_01(value: f32) -> f32 {
    value * 0.5 + 0.5
}

/// Gradient selected by the low 8 bits of a hash
#[inline]
pub fn gradient(hash: i32) -> Vec2 {
    let [x, y] = GRADIENTS[(hash & 255) as usize];
    Vec2::new(x, y)
}

/// Quintic smoothstep, 6t⁵ - 15t⁴ + 10t³
#[inline]
pub fn interp_quintic(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}
